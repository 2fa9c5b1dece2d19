//! Display orchestration engine
//!
//! Each `tick` resolves the display mode from the content store, draws one
//! frame and tells the caller when the next frame is due. The engine never
//! blocks and never fails; a surface error is reported in the outcome and
//! the next tick draws again.

pub mod render;

use marquee_display::{DisplayError, RenderSurface};
use marquee_protocol::Rgb;

use crate::animation::ScrollCursor;
use crate::config::{ClockConfig, DeviceConfig, LayoutConfig, TimingConfig, UnsyncedClockPolicy};
use crate::state::{DisplayMode, ModeInputs, RotationTimer, Transition};
use crate::store::ContentStore;
use crate::traits::{LocalTime, TimeSource};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Mode of the frame just drawn
    pub mode: DisplayMode,
    /// Mode change at the start of this frame
    pub transition: Option<Transition>,
    /// Delay until the next tick
    pub next_tick_in_ms: u32,
    /// Result of presenting the frame
    pub present: Result<(), DisplayError>,
}

/// Display orchestration engine
#[derive(Debug, Clone)]
pub struct Engine {
    timing: TimingConfig,
    layout: LayoutConfig,
    clock: ClockConfig,
    mode: DisplayMode,
    cursor: ScrollCursor,
    rotation: RotationTimer,
}

impl Engine {
    /// Create an engine showing the clock, with a message rotation due
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            timing: config.timing,
            layout: config.layout,
            clock: config.clock,
            mode: DisplayMode::Clock,
            cursor: ScrollCursor::new(0, 0),
            rotation: RotationTimer::Due,
        }
    }

    /// Mode of the last frame
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn rotation(&self) -> RotationTimer {
        self.rotation
    }

    pub fn cursor(&self) -> &ScrollCursor {
        &self.cursor
    }

    /// Draw one frame
    pub fn tick<T, R>(
        &mut self,
        store: &ContentStore,
        time: &T,
        surface: &mut R,
        now_ms: u64,
    ) -> TickOutcome
    where
        T: TimeSource,
        R: RenderSurface,
    {
        let alert = store.active_alert(now_ms);
        let enabled = store.enabled_message_count();

        if alert.is_some() {
            // Restart rotation right after the alert ends
            self.rotation = RotationTimer::Due;
        } else if enabled == 0 && self.rotation == RotationTimer::Active {
            self.arm_rotation(now_ms);
        }

        let next = DisplayMode::resolve(ModeInputs {
            alert_active: alert.is_some(),
            rotation_pending: self.rotation.is_pending(now_ms),
            enabled_messages: enabled,
        });
        let transition = Transition::between(self.mode, next);

        let (width, _) = surface.dimensions();
        let right_edge = width as i32;
        if next != self.mode {
            self.cursor.reset(right_edge, now_ms);
            if next == DisplayMode::MessageRotation {
                self.rotation = RotationTimer::Active;
            }
            self.mode = next;
        }

        let settings = store.settings();
        surface.set_brightness(settings.brightness);
        surface.clear();

        let y = self.layout.text_y as i32;
        let next_tick_in_ms = match (next, alert) {
            (DisplayMode::Alert, Some(alert)) => {
                let width = render::draw_scrolling(
                    surface,
                    &alert.text,
                    alert.color,
                    self.cursor.x(),
                    y,
                );
                self.cursor.advance(settings.scroll_speed, now_ms);
                if self.cursor.has_exited(width) {
                    self.cursor.reset(right_edge, now_ms);
                }
                self.timing.scroll_interval_ms
            }
            (DisplayMode::MessageRotation, _) => {
                let total = render::draw_messages(
                    surface,
                    store.enabled_messages(),
                    self.cursor.x(),
                    y,
                    self.layout.message_padding,
                );
                self.cursor.advance(settings.scroll_speed, now_ms);
                if self.cursor.has_exited(total) {
                    self.arm_rotation(now_ms);
                }
                self.timing.scroll_interval_ms
            }
            _ => {
                let time = time.now(now_ms);
                let color = self.clock_color(store, &time);
                render::draw_clock(
                    surface,
                    &time,
                    color,
                    self.layout.clock_x as i32,
                    y,
                    self.clock.blink_colon,
                );
                self.clock_delay(enabled, now_ms)
            }
        };

        TickOutcome {
            mode: next,
            transition,
            next_tick_in_ms,
            present: surface.present(),
        }
    }

    fn arm_rotation(&mut self, now_ms: u64) {
        self.rotation = RotationTimer::Armed {
            due_at_ms: now_ms.saturating_add(self.timing.message_delay_ms as u64),
        };
    }

    fn clock_color(&self, store: &ContentStore, time: &LocalTime) -> Rgb {
        match (time.synchronized, self.clock.unsynced) {
            (false, UnsyncedClockPolicy::AlertColor) => store.alert_color(),
            _ => store.settings().color,
        }
    }

    /// Clock redraw delay, shortened to wake when a rotation comes due
    fn clock_delay(&self, enabled: usize, now_ms: u64) -> u32 {
        let interval = self.timing.clock_interval_ms;
        match self.rotation.remaining_ms(now_ms) {
            Some(remaining) if enabled > 0 => remaining.min(interval as u64) as u32,
            _ => interval,
        }
    }
}
