//! Cache module - named caches backed by Moka.
//!
//! Repositories and the permission checker create their caches through a
//! shared `CacheRegistry`, so each domain owns a named `TypedCache` with
//! its own capacity and expiry policy.

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
