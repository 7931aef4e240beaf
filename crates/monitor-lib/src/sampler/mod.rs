//! Host metric sampling
//!
//! Samplers return exactly one `Sample` per metric on every call. A metric
//! that cannot be read comes back as an unavailable sentinel, never an
//! omission, so every downstream consumer sees a complete metric set.

mod system;

pub use system::SystemSampler;

use crate::models::{Metric, Sample};

pub use async_trait::async_trait;

/// Trait for metric sampling implementations
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Read all metrics for the current instant
    async fn sample(&self) -> Vec<Sample>;
}

/// Full sentinel set for a tick whose sample step failed outright
pub fn sentinel_set(timestamp: i64) -> Vec<Sample> {
    Metric::ALL
        .iter()
        .map(|m| Sample::unavailable(*m, timestamp))
        .collect()
}
