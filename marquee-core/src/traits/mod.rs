//! Collaborator traits
//!
//! The engine reads wall time through `TimeSource` and draws through
//! `RenderSurface`; both are supplied by the caller.

pub mod time;

pub use marquee_display::{DisplayError, RenderSurface};
pub use time::{LocalTime, TimeSource};
