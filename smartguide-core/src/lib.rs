//! smartguide-core: shared building blocks for the smartguide crates
//!
//! Holds the cross-crate error type, the multi-format configuration
//! document loader and the clock capability the narration loop is
//! timed against.

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_document, read_document, ConfigError};
pub use error::{Error, Result};
