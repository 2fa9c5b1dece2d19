//! Control link transmit task
//!
//! Writes replies back to the network bridge in the order they were produced.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPLIES;

/// Control TX task - sends one reply line per request
#[embassy_executor::task]
pub async fn control_tx_task(mut tx: BufferedUartTx) {
    info!("Control TX task started");

    loop {
        let reply = REPLIES.receive().await;
        let line = reply.encode();
        match tx.write_all(line.as_bytes()).await {
            Ok(()) => trace!("Reply sent: {}", reply.status.code()),
            Err(e) => warn!("Failed to send reply: {:?}", e),
        }
    }
}
