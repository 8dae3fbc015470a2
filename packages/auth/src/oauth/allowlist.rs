// ABOUTME: Locking allowlist naming the platforms whose refreshes must be coordinated
// ABOUTME: Parsed from a comma-separated environment variable; absence means unguarded refresh

use std::collections::HashSet;
use std::env;

/// Environment variable listing platforms whose token refreshes are
/// serialized through the lock store, e.g. "pipedrive,clio".
pub const LOCK_PLATFORMS_ENV: &str = "CRMBRIDGE_LOCK_PLATFORMS";

/// The configured set of platforms requiring coordinated refresh. Platforms
/// outside the set refresh unguarded, an accepted relaxation for providers
/// whose refresh tokens tolerate concurrent reuse.
#[derive(Debug, Clone, Default)]
pub struct LockAllowlist {
    platforms: HashSet<String>,
}

impl LockAllowlist {
    /// Parse a comma-separated list. Entries are trimmed; empty entries are
    /// skipped.
    pub fn from_csv(csv: &str) -> Self {
        let platforms = csv
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        Self { platforms }
    }

    /// Read the allowlist from [`LOCK_PLATFORMS_ENV`]; unset means empty.
    pub fn from_env() -> Self {
        match env::var(LOCK_PLATFORMS_ENV) {
            Ok(value) => Self::from_csv(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.platforms.contains(platform)
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}
