// ABOUTME: Core types and constants for CRMBridge
// ABOUTME: Foundational package providing shared credential state across all packages

pub mod constants;
pub mod types;

// Re-export main types
pub use types::UserToken;

// Re-export constants
pub use constants::{DEFAULT_LOCK_TIMEOUT_SECONDS, REFRESH_BUFFER_SECONDS};
