//! Storage crate: per-user saved-city persistence.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – SavedCity
//! - [`city_repo`] – CityRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`worker`] – CityStore, the single-slot worker that serializes all store calls

mod city_repo;
mod error;
mod models;
mod sqlite_pool;
mod worker;


pub use city_repo::CityRepository;
pub use error::StorageError;
pub use models::SavedCity;
pub use sqlite_pool::SqlitePoolManager;
pub use worker::CityStore;
