//! Display mode state machine
//!
//! The mode shown on each frame is a pure function of the content store and
//! the message rotation timer, evaluated at the start of the frame.

pub mod events;
pub mod machine;

pub use events::Transition;
pub use machine::{DisplayMode, ModeInputs, RotationTimer};
