//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod control_rx;
pub mod control_tx;
pub mod led;
pub mod runner;

pub use control_rx::control_rx_task;
pub use control_tx::control_tx_task;
pub use led::{led_task, LedStrip};
pub use runner::runner_task;
