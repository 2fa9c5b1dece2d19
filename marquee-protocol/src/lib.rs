//! Marquee control protocol
//!
//! This crate defines the request language spoken between the network bridge
//! and the display controller. Each request is a single text line shaped like
//! an HTTP request target:
//!
//! ```text
//! [GET ]/<verb>[?key=value[&key=value...]][ HTTP/1.1]
//! ```
//!
//! Arguments are percent-decoded and `+` stands for a space. The crate only
//! decodes and validates the shape of requests; applying them to display
//! state is the job of `marquee-core`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod args;
pub mod color;
pub mod line;
pub mod messages;

pub use args::{Args, ProtocolError, MAX_ARG_LEN};
pub use color::Rgb;
pub use line::{Line, LineParser};
pub use messages::{
    ControlReply, ControlRequest, LabelText, MessageText, Status, MAX_EPOCH_S, MAX_LABEL_LEN,
    MAX_LINE_LEN, MAX_REPLY_LEN, MAX_TEXT_LEN,
};
