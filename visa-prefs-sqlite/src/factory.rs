use async_trait::async_trait;
use tracing::debug;
use visa_core::prefs::{OpenMode, PreferenceStoreFactory, StoreConfig};
use visa_core::{PreferenceError, PreferenceStore};

use crate::store::{SqlitePreferenceStore, location_exists};

/// [`PreferenceStoreFactory`] for SQLite.
///
/// Register this with a [`visa_core::prefs::PreferenceRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use visa_core::prefs::PreferenceRegistry;
/// use visa_prefs_sqlite::SqlitePreferenceStoreFactory;
///
/// let mut registry = PreferenceRegistry::new();
/// registry.register(Box::new(SqlitePreferenceStoreFactory));
/// ```
pub struct SqlitePreferenceStoreFactory;

#[async_trait]
impl PreferenceStoreFactory for SqlitePreferenceStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.location` and run migrations.
    ///
    /// Accepted locations:
    /// * A bare file path, e.g. `"preferences.db"`. With [`OpenMode::Create`]
    ///   the file is created if it does not exist; with
    ///   [`OpenMode::Existing`] a missing file is
    ///   [`PreferenceError::NotFound`] and nothing is written to disk.
    /// * A sqlx URL starting with `sqlite:`, used as given.
    /// * `":memory:"` for an ephemeral in-memory database.
    async fn open(
        &self,
        config: &StoreConfig,
        mode: OpenMode,
    ) -> Result<Box<dyn PreferenceStore>, PreferenceError> {
        if mode == OpenMode::Existing && !location_exists(&config.location) {
            debug!(location = %config.location, "no sqlite preference file yet");
            return Err(PreferenceError::NotFound(config.location.clone()));
        }

        let store = SqlitePreferenceStore::open(&config.location)
            .await
            .map_err(|e| PreferenceError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| PreferenceError::Storage(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use visa_core::prefs::{OpenMode, PreferenceStoreFactory, StoreConfig, load_theme, toggle_theme};
    use visa_core::{PreferenceError, Theme};

    use super::SqlitePreferenceStoreFactory;

    fn memory_config() -> StoreConfig {
        StoreConfig {
            backend: "sqlite".to_string(),
            location: ":memory:".to_string(),
        }
    }

    fn file_config(path: &std::path::Path) -> StoreConfig {
        StoreConfig {
            backend: "sqlite".to_string(),
            location: path.to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqlitePreferenceStoreFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn opens_in_memory_store_in_either_mode() {
        for mode in [OpenMode::Create, OpenMode::Existing] {
            let result = SqlitePreferenceStoreFactory.open(&memory_config(), mode).await;
            assert!(
                result.is_ok(),
                "failed to open in-memory store ({mode:?}): {:#?}",
                result.err()
            );
        }
    }

    #[tokio::test]
    async fn theme_toggle_round_trips_through_sqlite() {
        let store = SqlitePreferenceStoreFactory
            .open(&memory_config(), OpenMode::Create)
            .await
            .unwrap();

        let initial = load_theme(&*store).await.unwrap();
        let toggled = toggle_theme(&*store, initial).await.unwrap();

        assert_eq!(initial, Theme::Light);
        assert_eq!(toggled, Theme::Dark);
        assert_eq!(load_theme(&*store).await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn existing_mode_leaves_missing_file_uncreated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        let err = SqlitePreferenceStoreFactory
            .open(&file_config(&path), OpenMode::Existing)
            .await
            .err();

        assert_eq!(
            err,
            Some(PreferenceError::NotFound(path.to_string_lossy().into_owned()))
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn existing_mode_reads_a_file_created_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        {
            let store = SqlitePreferenceStoreFactory
                .open(&file_config(&path), OpenMode::Create)
                .await
                .unwrap();
            toggle_theme(&*store, Theme::Light).await.unwrap();
        }

        let store = SqlitePreferenceStoreFactory
            .open(&file_config(&path), OpenMode::Existing)
            .await
            .unwrap();

        assert_eq!(load_theme(&*store).await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn unopenable_location_is_a_connection_error() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            location: "/nonexistent-dir/definitely/missing/prefs.db".to_string(),
        };

        let result = SqlitePreferenceStoreFactory.open(&config, OpenMode::Create).await;

        assert!(matches!(result, Err(PreferenceError::Connection(_))));
    }
}
