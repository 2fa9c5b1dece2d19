//! Configuration types and parsing
//!
//! Board-agnostic configuration structures, loaded from the `device.toml`
//! embedded in the firmware image.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
