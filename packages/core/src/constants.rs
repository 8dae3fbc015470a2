// ABOUTME: Workspace-wide constants for token lifecycle timing
// ABOUTME: The refresh buffer and lock budget are independent knobs and must not be conflated

/// Seconds subtracted from a token's recorded expiry before comparing it to
/// now, so a token is refreshed slightly before it actually lapses. A caller
/// that reads a "still valid" token therefore has at least this long to use
/// it.
pub const REFRESH_BUFFER_SECONDS: i64 = 120;

/// Default budget, in seconds, for one guarded refresh. Waiters on the same
/// user give up after this long, and a lock older than this is presumed
/// abandoned.
pub const DEFAULT_LOCK_TIMEOUT_SECONDS: u64 = 30;
