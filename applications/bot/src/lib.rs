//! Jukebox Bot Library
//!
//! Chat command layer on top of the playback sessions: command parsing and
//! dispatch, configuration, a catalog-backed resolver and a console front-end
//! that simulates the voice platform.
//!
//! This library exposes the components for the binary and for testing.

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod resolver;

// Re-export commonly used types for convenience
pub use commands::{Bot, Command};
pub use config::BotConfig;
pub use console::{Console, Transcript};
pub use error::{BotError, Result};
pub use resolver::CatalogResolver;
