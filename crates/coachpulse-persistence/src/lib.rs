//! Coachpulse Persistence
//!
//! SQLite-backed implementation of the `SentimentStore` trait.

pub mod database;
pub mod store;

pub use database::Database;
pub use store::SqliteSentimentStore;
