pub mod calculations;
pub mod models;
pub mod prefs;

pub use calculations::{Estimator, estimate};
pub use models::*;
pub use prefs::{PreferenceError, PreferenceStore};
