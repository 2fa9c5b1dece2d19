//! LED output task
//!
//! Pushes each presented frame to the WS2812 chain through PIO0.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::{Grb, PioWs2812};

use crate::channels::FRAME;
use crate::display::LED_COUNT;

/// WS2812 driver on PIO0 state machine 0
pub type LedStrip = PioWs2812<'static, PIO0, 0, LED_COUNT, Grb>;

/// LED task - writes the latest frame to the strip
#[embassy_executor::task]
pub async fn led_task(mut strip: LedStrip) {
    info!("LED task started ({} LEDs)", LED_COUNT);

    let mut frames: u32 = 0;
    loop {
        let frame = FRAME.wait().await;
        strip.write(&frame).await;

        frames = frames.wrapping_add(1);
        if frames % 1000 == 0 {
            trace!("{} frames written", frames);
        }
    }
}
