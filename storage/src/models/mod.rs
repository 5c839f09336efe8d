//! Storage models.

mod saved_city;

pub use saved_city::SavedCity;
