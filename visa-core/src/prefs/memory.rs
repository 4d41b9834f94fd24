use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::factory::{OpenMode, PreferenceStoreFactory, StoreConfig};
use super::store::{PreferenceError, PreferenceStore};

/// Preferences held in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PreferenceError> {
        self.values
            .lock()
            .map_err(|e| PreferenceError::Storage(format!("preference map poisoned: {e}")))
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`PreferenceStoreFactory`] for the `"memory"` backend. Every open
/// starts empty, whatever the location or mode.
pub struct MemoryPreferenceStoreFactory;

#[async_trait]
impl PreferenceStoreFactory for MemoryPreferenceStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn open(
        &self,
        _config: &StoreConfig,
        _mode: OpenMode,
    ) -> Result<Box<dyn PreferenceStore>, PreferenceError> {
        Ok(Box::new(MemoryPreferenceStore::new()))
    }
}
