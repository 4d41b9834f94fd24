pub mod factory;
pub mod memory;
pub mod store;
pub mod theme;

pub use factory::{OpenMode, PreferenceRegistry, PreferenceStoreFactory, StoreConfig};
pub use memory::{MemoryPreferenceStore, MemoryPreferenceStoreFactory};
pub use store::{PreferenceError, PreferenceStore};
pub use theme::{THEME_KEY, load_theme, save_theme, toggle_theme};
