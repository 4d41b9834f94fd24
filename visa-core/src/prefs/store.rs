use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    /// The store itself does not exist yet. Carries its location.
    #[error("no preference store at '{0}'")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A persistent key-value slot for user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Writes `value`, replacing any previous value for `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
