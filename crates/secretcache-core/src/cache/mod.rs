//! Process-lifetime cache of encrypted secret values

mod store;

pub use store::CacheStore;
