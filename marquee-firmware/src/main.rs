//! Marquee - LED Matrix Clock, Alert and Message Display
//!
//! Firmware for an RP2040 driving a 32x8 WS2812 matrix. A network bridge
//! on UART0 pushes alerts, messages, settings and the time of day as
//! request lines; the display shows the clock, a scrolling alert, or a
//! rotation of the stored messages.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::display::LedMatrix;

/// Embedded device configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

mod channels;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// The WS2812 driver borrows its PIO program for its whole lifetime
static WS2812_PROGRAM: StaticCell<PioWs2812Program<'static, PIO0>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);

    // Setup UART for the network bridge
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for control link");

    // Setup PIO0 for the WS2812 chain (data on GPIO2)
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);

    let program = WS2812_PROGRAM.init(PioWs2812Program::new(&mut common));
    let strip = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_2, program);

    info!("PIO WS2812 initialized");

    let matrix = LedMatrix::new(config.display.strip_layout);

    // Spawn tasks
    spawner.spawn(tasks::control_rx_task(rx)).unwrap();
    spawner.spawn(tasks::control_tx_task(tx)).unwrap();
    spawner.spawn(tasks::led_task(strip)).unwrap();
    spawner.spawn(tasks::runner_task(config, matrix)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
