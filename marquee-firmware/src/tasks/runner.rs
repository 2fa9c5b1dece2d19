//! Runner task
//!
//! Owns the device state and drives the cooperative scheduler. Every piece
//! of code that touches the content store or the clock runs here, one task
//! step at a time, so no update is ever observed half-applied.
//!
//! Scheduled work:
//! - `render`: one engine tick, rescheduled by the delay the engine asks for
//!   and woken early after any request that changes what is shown
//! - `control`: applies queued requests and queues their replies
//! - `housekeeping`: purges expired alerts and watches clock sync

use core::cell::Cell;

use defmt::*;
use embassy_time::{Instant, Timer};

use marquee_core::config::DeviceConfig;
use marquee_core::control;
use marquee_core::engine::Engine;
use marquee_core::scheduler::{Scheduler, Yield};
use marquee_core::Device;
use marquee_protocol::ControlReply;

use crate::channels::{REPLIES, REQUESTS};
use crate::display::LedMatrix;

/// Number of scheduled tasks
const TASK_COUNT: usize = 3;

/// Runner task - the single owner of device state
#[embassy_executor::task]
pub async fn runner_task(config: DeviceConfig, mut matrix: LedMatrix) {
    info!("Runner task started");

    let mut engine = Engine::new(&config);
    let control_poll_ms = config.timing.control_poll_ms;
    let housekeeping_ms = config.timing.housekeeping_interval_ms;

    let mut render = |device: &mut Device, now_ms: u64| -> Yield {
        let outcome = engine.tick(&device.store, &device.clock, &mut matrix, now_ms);
        if let Some(transition) = outcome.transition {
            info!("Display: {:?}", transition);
        }
        if let Err(e) = outcome.present {
            warn!("Frame not presented: {:?}", e);
        }
        Yield::After(outcome.next_tick_in_ms)
    };

    let redraw = Cell::new(false);
    let mut serve = |device: &mut Device, now_ms: u64| -> Yield {
        // Leave queued requests alone until their replies have room
        while REPLIES.free_capacity() > 0 {
            let Ok(request) = REQUESTS.try_receive() else {
                break;
            };
            let reply = match request {
                Ok(request) => {
                    debug!("Handling {}", request.path());
                    let reply = control::handle(device, &request, now_ms);
                    if reply.is_ok() && !request.is_query() {
                        redraw.set(true);
                    }
                    reply
                }
                Err(e) => ControlReply::from(e),
            };
            if !reply.is_ok() {
                debug!("Request rejected: {} {}", reply.status.code(), reply.body.as_str());
            }
            if REPLIES.try_send(reply).is_err() {
                warn!("Reply channel full, dropping reply");
            }
        }
        Yield::After(control_poll_ms)
    };

    let mut was_synchronized = false;
    let mut housekeeping = |device: &mut Device, now_ms: u64| -> Yield {
        if device.store.expire_alert(now_ms) {
            info!("Alert expired");
        }

        let synchronized = device.clock.is_synchronized(now_ms);
        if synchronized != was_synchronized {
            if synchronized {
                info!("Clock synchronized");
            } else {
                warn!("Clock not synchronized");
            }
            was_synchronized = synchronized;
        }
        if synchronized && device.clock.needs_resync(now_ms) {
            trace!("Clock resync due, age {:?} s", device.clock.sync_age_s(now_ms));
        }
        Yield::After(housekeeping_ms)
    };

    let mut scheduler: Scheduler<'_, Device, TASK_COUNT> = Scheduler::new(Device::new(&config));
    if let Err(e) = scheduler.spawn("render", &mut render) {
        error!("Failed to schedule render: {:?}", e);
    }
    if let Err(e) = scheduler.spawn("control", &mut serve) {
        error!("Failed to schedule control: {:?}", e);
    }
    if let Err(e) = scheduler.spawn("housekeeping", &mut housekeeping) {
        error!("Failed to schedule housekeeping: {:?}", e);
    }

    loop {
        let now_ms = Instant::now().as_millis();
        scheduler.run_once(now_ms);
        if redraw.replace(false) {
            scheduler.wake("render", now_ms);
        }
        let Some(wake_ms) = scheduler.next_wake() else {
            error!("Run queue empty, runner stopping");
            return;
        };
        Timer::at(Instant::from_millis(wake_ms)).await;
    }
}
