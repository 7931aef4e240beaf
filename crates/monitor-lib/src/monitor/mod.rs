//! Monitoring loop
//!
//! Ties sampling, history, prediction, evaluation, and source polling into
//! one scheduled tick, and hands each tick's alert batch to the Reporter.

mod r#loop;
mod reporter;

pub use r#loop::{LoopState, MonitorLoop, MonitorLoopBuilder};
pub use reporter::{LogReporter, Reporter};
