//! Control link receive task
//!
//! Assembles request lines from the network bridge and queues them, decoded,
//! for the runner.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use marquee_protocol::{ControlRequest, LineParser};

use crate::channels::REQUESTS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Control RX task - receives and decodes request lines
#[embassy_executor::task]
pub async fn control_rx_task(mut rx: BufferedUartRx) {
    info!("Control RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    let request = match parser.feed(byte) {
                        Ok(Some(line)) => {
                            debug!("Request: {}", line.as_str());
                            ControlRequest::parse(&line)
                        }
                        Ok(None) => continue,
                        Err(e) => {
                            warn!("Line error: {:?}", e);
                            Err(e)
                        }
                    };
                    // Waits while the runner is behind
                    REQUESTS.send(request).await;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
