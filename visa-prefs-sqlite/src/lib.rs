mod factory;
mod store;

pub use factory::SqlitePreferenceStoreFactory;
pub use store::SqlitePreferenceStore;
