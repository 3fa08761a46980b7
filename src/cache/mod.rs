//! Refreshing catalog cache
//!
//! Slowly-changing catalog data (channel lists, service definitions) is held
//! in a [`RefreshingCache`]: a concurrently accessed list populated by an
//! injected async loader, warmed up once at construction and refreshed on a
//! fixed interval for the lifetime of the owning value.

pub mod config;
pub mod container;

pub use config::CacheConfig;
pub use container::RefreshingCache;
