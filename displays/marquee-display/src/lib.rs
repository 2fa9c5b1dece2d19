//! Render surface abstraction and LED matrix framebuffer for Marquee
//!
//! This crate provides:
//! - `RenderSurface` trait: the drawing primitives the display engine uses
//! - `Canvas`: an off-screen pixel framebuffer implementing `RenderSurface`
//!   (and `embedded_graphics::DrawTarget`) with a monospace font
//! - `StripLayout`: mapping from matrix coordinates to LED chain order
//!
//! # Architecture
//!
//! The engine never touches LEDs. It draws into a `RenderSurface`; the
//! firmware wraps a `Canvas`, and on `present()` serializes the pixels in
//! chain order with brightness applied and hands them to the LED driver.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod canvas;
pub mod layout;

// Re-export key types
pub use backend::{DisplayError, RenderSurface};
pub use canvas::{to_rgb888, Canvas};
pub use layout::{scale_brightness, StripLayout};
