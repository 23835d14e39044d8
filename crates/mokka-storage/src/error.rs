//! Error types for settings persistence.

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing the settings record.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the settings file failed.
    #[error("Settings file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file holds something that is not a settings record.
    #[error("Settings file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
