//! Theme preference, read once at startup and written on every toggle.

use tracing::{debug, warn};

use super::store::{PreferenceError, PreferenceStore};
use crate::models::Theme;

/// Key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

/// Reads the stored theme.
///
/// Falls back to [`Theme::default`] when nothing is stored or the stored
/// value is not a known theme.
pub async fn load_theme(store: &dyn PreferenceStore) -> Result<Theme, PreferenceError> {
    let Some(stored) = store.get(THEME_KEY).await? else {
        debug!("no stored theme; using default");
        return Ok(Theme::default());
    };

    match Theme::parse(&stored) {
        Some(theme) => Ok(theme),
        None => {
            warn!(stored = %stored, "unrecognised stored theme; using default");
            Ok(Theme::default())
        }
    }
}

/// Persists `theme`.
pub async fn save_theme(
    store: &dyn PreferenceStore,
    theme: Theme,
) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, theme.as_str()).await
}

/// Switches from `current` to the other theme, persists it and returns it.
pub async fn toggle_theme(
    store: &dyn PreferenceStore,
    current: Theme,
) -> Result<Theme, PreferenceError> {
    let next = current.toggled();
    save_theme(store, next).await?;
    debug!(from = %current, to = %next, "theme toggled");
    Ok(next)
}
