//! Coachpulse Core
//!
//! Core types, traits, and the roster index for the coachpulse
//! sentiment engine.

pub mod config;
pub mod error;
pub mod roster;
pub mod sentiment;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use roster::*;
pub use sentiment::*;
pub use traits::*;
pub use types::*;
