//! Control plane
//!
//! Applies decoded control requests to the device and builds the reply.
//! Every request gets exactly one reply.

use core::fmt;

use marquee_protocol::{ControlReply, ControlRequest, ProtocolError};

use crate::device::Device;
use crate::store::{slot_index, StoreError};

/// Errors raised while serving a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// Request could not be decoded
    Protocol(ProtocolError),
    /// Store rejected the change
    Store(StoreError),
}

impl From<ProtocolError> for ControlError {
    fn from(error: ProtocolError) -> Self {
        ControlError::Protocol(error)
    }
}

impl From<StoreError> for ControlError {
    fn from(error: StoreError) -> Self {
        ControlError::Store(error)
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Protocol(e) => fmt::Display::fmt(e, f),
            ControlError::Store(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl From<ControlError> for ControlReply {
    fn from(error: ControlError) -> Self {
        match error {
            ControlError::Protocol(e) => e.into(),
            ControlError::Store(e) => ControlReply::bad_request(e),
        }
    }
}

/// Apply a request and build its reply
pub fn handle(device: &mut Device, request: &ControlRequest, now_ms: u64) -> ControlReply {
    apply(device, request, now_ms).unwrap_or_else(ControlReply::from)
}

/// Decode and apply a raw request line
pub fn handle_line(device: &mut Device, line: &str, now_ms: u64) -> ControlReply {
    ControlRequest::parse(line)
        .map_err(ControlError::from)
        .and_then(|request| apply(device, &request, now_ms))
        .unwrap_or_else(ControlReply::from)
}

fn apply(
    device: &mut Device,
    request: &ControlRequest,
    now_ms: u64,
) -> Result<ControlReply, ControlError> {
    let store = &mut device.store;

    let reply = match request {
        ControlRequest::Brightness { value } => {
            if let Some(value) = *value {
                let value = value.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                store.set_brightness(value)?;
            }
            ControlReply::ok(store.settings().brightness)
        }
        ControlRequest::ScrollSpeed { value } => {
            if let Some(speed) = *value {
                store.set_scroll_speed(speed)?;
            }
            ControlReply::ok(store.settings().scroll_speed)
        }
        ControlRequest::Color { value } => {
            if let Some(color) = *value {
                store.set_color(color);
            }
            ControlReply::ok(store.settings().color)
        }
        ControlRequest::SetAlert {
            text,
            color,
            timeout_ms,
        } => {
            store.set_alert(text, *color, *timeout_ms, now_ms)?;
            ControlReply::ok("Alert set")
        }
        ControlRequest::ClearAlert => {
            store.clear_alert();
            ControlReply::ok("Alert cleared")
        }
        ControlRequest::SetMessage {
            index,
            label,
            text,
            color,
        } => {
            store.set_message(slot_index(*index)?, label, text, *color)?;
            ControlReply::ok("Message set")
        }
        ControlRequest::ClearMessage { index } => {
            store.clear_message(slot_index(*index)?)?;
            ControlReply::ok("Message cleared")
        }
        ControlRequest::SetTime { epoch_s } => {
            device.clock.sync(*epoch_s, now_ms);
            ControlReply::ok("Time set")
        }
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_protocol::{Rgb, Status};

    fn body(reply: &ControlReply) -> &str {
        reply.body.as_str()
    }

    #[test]
    fn test_brightness_get_set() {
        let mut device = Device::default();
        let reply = handle_line(&mut device, "/brightness", 0);
        assert_eq!((reply.status, body(&reply)), (Status::Ok, "2"));

        let reply = handle_line(&mut device, "/brightness?value=999", 0);
        assert_eq!(body(&reply), "255");

        let reply = handle_line(&mut device, "/brightness?value=-4", 0);
        assert_eq!(reply.status, Status::BadRequest);
        assert_eq!(body(&reply), "Invalid value");
        assert_eq!(device.store.settings().brightness, 255);

        let reply = handle_line(&mut device, "/brightness?value=abc", 0);
        assert_eq!((reply.status, body(&reply)), (Status::BadRequest, "Invalid value"));
    }

    #[test]
    fn test_scroll_speed_and_color() {
        let mut device = Device::default();
        let reply = handle_line(&mut device, "GET /scrollSpeed?value=24.5 HTTP/1.1", 0);
        assert_eq!(body(&reply), "24.5");

        let reply = handle_line(&mut device, "/scrollSpeed?value=0", 0);
        assert_eq!(reply.status, Status::BadRequest);
        assert_eq!(device.store.settings().scroll_speed, 24.5);

        let reply = handle_line(&mut device, "/color", 0);
        assert_eq!(body(&reply), "4AABFF");
        let reply = handle_line(&mut device, "/color?value=%23FF0000", 0);
        assert_eq!(body(&reply), "FF0000");
        assert_eq!(device.store.settings().color, Rgb::RED);
    }

    #[test]
    fn test_alert_verbs() {
        let mut device = Device::default();
        let reply = handle_line(&mut device, "/setAlert?text=fire&timeout=500", 1_000);
        assert_eq!((reply.status, body(&reply)), (Status::Ok, "Alert set"));
        assert!(device.store.active_alert(1_499).is_some());
        assert!(device.store.active_alert(1_500).is_none());

        let reply = handle_line(&mut device, "/setAlert?color=FF0000", 0);
        assert_eq!((reply.status, body(&reply)), (Status::BadRequest, "Missing arguments"));

        let reply = handle_line(&mut device, "/clearAlert", 0);
        assert_eq!(body(&reply), "Alert cleared");
        let reply = handle_line(&mut device, "/clearAlert", 0);
        assert!(reply.is_ok());
    }

    #[test]
    fn test_message_verbs() {
        let mut device = Device::default();
        let reply = handle_line(
            &mut device,
            "/setMessage?index=1&label=Temp&text=21+C&color=00FF00",
            0,
        );
        assert_eq!((reply.status, body(&reply)), (Status::Ok, "Message set"));
        let message = device.store.message(1).unwrap();
        assert_eq!(message.text.as_str(), "21 C");
        assert_eq!(message.color, Rgb::GREEN);

        let reply = handle_line(&mut device, "/clearMessage?index=1", 0);
        assert_eq!(body(&reply), "Message cleared");
        assert_eq!(device.store.enabled_message_count(), 0);
    }

    #[test]
    fn test_message_index_out_of_range() {
        let mut device = Device::default();
        for line in [
            "/setMessage?index=3&label=a&text=b&color=FFFFFF",
            "/setMessage?index=-1&label=a&text=b&color=FFFFFF",
            "/clearMessage?index=99",
        ] {
            let reply = handle_line(&mut device, line, 0);
            assert_eq!(reply.status, Status::BadRequest, "{}", line);
            assert_eq!(body(&reply), "Index out of range");
        }
        assert_eq!(device.store.enabled_message_count(), 0);

        let reply = handle_line(&mut device, "/setMessage?index=0&label=a&text=b", 0);
        assert_eq!(body(&reply), "Missing arguments");
    }

    #[test]
    fn test_set_time_syncs_clock() {
        let mut device = Device::default();
        assert!(!device.clock.is_synchronized(5_000));
        let reply = handle_line(&mut device, "/setTime?epoch=1704067200", 5_000);
        assert_eq!(body(&reply), "Time set");
        assert!(device.clock.is_synchronized(5_000));
        assert_eq!(device.clock.epoch_s(6_000), Some(1_704_067_201));
    }

    #[test]
    fn test_out_of_range_epoch_rejected_and_engine_keeps_ticking() {
        use crate::config::DeviceConfig;
        use crate::engine::Engine;
        use crate::state::DisplayMode;
        use marquee_display::Canvas;

        let mut device = Device::default();
        let reply = handle_line(&mut device, "/setTime?epoch=9223372036854775807", 0);
        assert_eq!((reply.status, body(&reply)), (Status::BadRequest, "Invalid epoch"));
        assert_eq!(device.clock.epoch_s(0), None);

        let reply = handle_line(&mut device, "/setTime?epoch=4294967295", 0);
        assert!(reply.is_ok());

        let mut engine = Engine::new(&DeviceConfig::default());
        let mut canvas = Canvas::<32, 8>::new();
        for now_ms in [0, 1_000, 86_400_000, u64::MAX / 2] {
            let outcome = engine.tick(&device.store, &device.clock, &mut canvas, now_ms);
            assert_eq!(outcome.mode, DisplayMode::Clock);
            assert_eq!(outcome.present, Ok(()));
        }
    }

    #[test]
    fn test_woken_render_draws_short_alert_before_expiry() {
        use crate::config::DeviceConfig;
        use crate::engine::Engine;
        use crate::scheduler::{Scheduler, Yield};
        use crate::state::DisplayMode;
        use marquee_display::Canvas;

        fn run(wake_on_change: bool) -> Vec<(u64, DisplayMode)> {
            let config = DeviceConfig::default();
            let mut engine = Engine::new(&config);
            let mut canvas = Canvas::<32, 8>::new();
            let mut frames = Vec::new();
            let mut render = |device: &mut Device, now_ms: u64| {
                let outcome = engine.tick(&device.store, &device.clock, &mut canvas, now_ms);
                frames.push((now_ms, outcome.mode));
                Yield::After(outcome.next_tick_in_ms)
            };
            let mut sched: Scheduler<'_, Device, 1> = Scheduler::new(Device::new(&config));
            sched.spawn("render", &mut render).unwrap();

            // Clock frame, next one a full clock interval away
            assert_eq!(sched.run_once(0), Some(1_000));

            let request = ControlRequest::parse("/setAlert?text=fire&timeout=500").unwrap();
            let reply = handle(sched.shared_mut(), &request, 10);
            if wake_on_change && reply.is_ok() && !request.is_query() {
                assert!(sched.wake("render", 10));
            }

            let mut now_ms = 10;
            while now_ms < 2_000 {
                now_ms = sched.run_once(now_ms).unwrap().max(now_ms + 1);
            }
            drop(sched);
            frames
        }

        let woken = run(true);
        assert!(woken
            .iter()
            .any(|&(at, mode)| mode == DisplayMode::Alert && (10..510).contains(&at)));

        let sleeping = run(false);
        assert!(sleeping.iter().all(|&(_, mode)| mode == DisplayMode::Clock));
    }

    #[test]
    fn test_unknown_verb() {
        let mut device = Device::default();
        let reply = handle_line(&mut device, "/reboot", 0);
        assert_eq!((reply.status, body(&reply)), (Status::NotFound, "Not found"));
        assert_eq!(reply.encode().as_str(), "404 Not found\n");
    }

    #[test]
    fn test_handle_decoded_request() {
        let mut device = Device::default();
        let request = ControlRequest::ClearMessage { index: 2 };
        assert!(handle(&mut device, &request, 0).is_ok());
        let request = ControlRequest::ClearMessage { index: 3 };
        assert_eq!(
            apply(&mut device, &request, 0),
            Err(ControlError::Store(StoreError::OutOfRange {
                index: 3,
                capacity: crate::store::MESSAGE_SLOTS
            }))
        );
    }
}
