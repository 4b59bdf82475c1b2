//! Coachpulse Observability
//!
//! Logging configuration shared by the binary and integration tests.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
