//! Content store
//!
//! The single owner of display settings, the alert and the message slots.

pub mod content;

pub use content::{
    slot_index, Alert, ContentStore, DisplaySettings, Field, Message, StoreError, MESSAGE_SLOTS,
};
