//! Bounded sample history
//!
//! One fixed-capacity ring buffer per metric. The monitor loop is the single
//! writer; readers only ever see owned snapshot copies, so a snapshot can
//! never observe a partially applied push.

use crate::models::{Metric, Sample};
use std::collections::{HashMap, VecDeque};

/// Ring buffer retaining the most recent samples for one metric
#[derive(Debug)]
pub struct HistoryBuffer {
    buffer: VecDeque<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(10_000)),
            capacity: capacity.max(1),
        }
    }

    /// O(1) insert, evicting the oldest sample at capacity
    pub fn push(&mut self, sample: Sample) {
        while self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    /// Owned chronological copy, safe to hand to concurrent readers
    pub fn snapshot(&self) -> Vec<Sample> {
        self.buffer.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Per-metric history owned exclusively by the monitor loop
#[derive(Debug)]
pub struct MetricHistory {
    buffers: HashMap<Metric, HistoryBuffer>,
}

impl MetricHistory {
    /// Create one buffer per known metric, each with the given capacity
    pub fn new(capacity: usize) -> Self {
        let buffers = Metric::ALL
            .iter()
            .map(|m| (*m, HistoryBuffer::new(capacity)))
            .collect();
        Self { buffers }
    }

    /// Push an available sample into its metric's buffer
    ///
    /// Unavailable sentinels are rejected by the caller; a push for a metric
    /// without a buffer indicates corrupted state and is reported as such.
    pub fn push(&mut self, sample: Sample) -> Result<(), crate::error::MonitorError> {
        match self.buffers.get_mut(&sample.metric) {
            Some(buffer) => {
                buffer.push(sample);
                Ok(())
            }
            None => Err(crate::error::MonitorError::LoopFatal(format!(
                "no history buffer registered for metric {}",
                sample.metric
            ))),
        }
    }

    pub fn snapshot(&self, metric: Metric) -> Vec<Sample> {
        self.buffers
            .get(&metric)
            .map(|b| b.snapshot())
            .unwrap_or_default()
    }

    pub fn len(&self, metric: Metric) -> usize {
        self.buffers.get(&metric).map(|b| b.len()).unwrap_or(0)
    }
}
