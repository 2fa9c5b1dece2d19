//! Board-agnostic core logic for the Marquee display
//!
//! This crate contains everything that decides what the LED matrix shows,
//! independent of the microcontroller it runs on:
//!
//! - Content store (settings, alert, message slots)
//! - Display mode state machine and scroll math
//! - Display orchestration engine (one frame per tick)
//! - Cooperative scheduler sharing state between tasks
//! - Control request handling
//! - Wall clock and configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod clock;
pub mod config;
pub mod control;
pub mod device;
pub mod engine;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod traits;

pub use device::Device;
