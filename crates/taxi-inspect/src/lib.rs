//! Command-line inspector for taxi-dispatch wire records.
//!
//! Decodes captured broker payloads into JSON, builds dispatch messages
//! from flags or JSON, and lists the status code space.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod tracing;

pub use cli::Cli;
pub use config::InspectConfig;
pub use error::{InspectError, InspectResult};
