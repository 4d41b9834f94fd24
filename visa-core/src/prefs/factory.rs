//! Choosing a preference backend by name.
//!
//! ```toml
//! [preferences]
//! backend = "sqlite"          # or "memory"
//! location = "preferences.db" # sqlite: file path, sqlx URL or ":memory:"
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::{PreferenceError, PreferenceStore};

/// Where preferences live. `location` is interpreted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    pub location: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            location: "preferences.db".to_string(),
        }
    }
}

/// Whether opening a store may create it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the store if it does not exist yet. Used before a write.
    Create,
    /// Only open a store that already exists; a missing one is
    /// [`PreferenceError::NotFound`]. Used for read-only startup.
    Existing,
}

/// Opens stores for one backend.
#[async_trait]
pub trait PreferenceStoreFactory: Send + Sync {
    /// Name matched against [`StoreConfig::backend`].
    fn backend_name(&self) -> &'static str;

    async fn open(
        &self,
        config: &StoreConfig,
        mode: OpenMode,
    ) -> Result<Box<dyn PreferenceStore>, PreferenceError>;
}

/// The backends a binary was built with.
#[derive(Default)]
pub struct PreferenceRegistry {
    backends: Vec<Box<dyn PreferenceStoreFactory>>,
}

impl PreferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, dropping any earlier backend with the same name.
    pub fn register(&mut self, factory: Box<dyn PreferenceStoreFactory>) {
        let name = factory.backend_name();
        self.backends.retain(|existing| existing.backend_name() != name);
        self.backends.push(factory);
    }

    /// Backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.backends.iter().map(|f| f.backend_name()).collect();
        names.sort_unstable();
        names
    }

    /// Opens the store `config` names.
    ///
    /// An unregistered backend is a [`PreferenceError::Configuration`] that
    /// lists the registered ones.
    pub async fn open(
        &self,
        config: &StoreConfig,
        mode: OpenMode,
    ) -> Result<Box<dyn PreferenceStore>, PreferenceError> {
        let Some(factory) = self
            .backends
            .iter()
            .find(|f| f.backend_name() == config.backend)
        else {
            return Err(PreferenceError::Configuration(format!(
                "no preference backend named '{}' (known: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        debug!(backend = %config.backend, location = %config.location, ?mode, "opening preference store");
        factory.open(config, mode).await
    }
}
