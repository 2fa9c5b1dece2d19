//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Only owned values cross task boundaries; the device state lives inside
//! the runner task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use smart_leds::RGB8;

use marquee_protocol::{ControlReply, ControlRequest, ProtocolError};

use crate::display::LED_COUNT;

/// Channel capacity for decoded control requests
const REQUEST_CHANNEL_SIZE: usize = 8;

/// Channel capacity for replies awaiting transmission
const REPLY_CHANNEL_SIZE: usize = 8;

/// Decoded requests from the control link
///
/// Decode failures travel the same path so their replies keep request order.
pub static REQUESTS: Channel<
    CriticalSectionRawMutex,
    Result<ControlRequest, ProtocolError>,
    REQUEST_CHANNEL_SIZE,
> = Channel::new();

/// Replies to send back over the control link
pub static REPLIES: Channel<CriticalSectionRawMutex, ControlReply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Latest frame in LED chain order, ready for the strip
///
/// A newer frame replaces one the LED task has not picked up yet.
pub static FRAME: Signal<CriticalSectionRawMutex, [RGB8; LED_COUNT]> = Signal::new();
