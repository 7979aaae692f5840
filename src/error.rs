//! Error types for geocoin
//!
//! Gameplay never fails: an empty cache or inventory is a no-op. Errors only
//! come from loading configuration or saved games, and from the storage
//! backend.

use thiserror::Error;

/// Result type alias for geocoin operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Saved data was not valid JSON for the expected layout
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    /// Save was written by an incompatible version
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Save parsed but breaks an invariant
    #[error("corrupt save data: {0}")]
    Corrupt(String),

    /// Storage backend rejected a read or write
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration values out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
