//! Caching for reference data read from the CRM site.

pub mod timed_cache;

pub use timed_cache::TimedCache;
