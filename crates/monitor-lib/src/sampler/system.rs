//! sysinfo-backed host sampler
//!
//! CPU and memory are read as percentages; traffic is derived from the
//! network byte delta since the previous call, reported in KiB/s. The first
//! call has no delta and reports traffic as unavailable.

use super::Sampler;
use crate::models::{Metric, Sample};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, RefreshKind, System};
use tracing::warn;

struct SamplerState {
    sys: System,
    networks: Networks,
    /// Cumulative rx+tx bytes at the previous call
    last_net: Option<(Instant, u64)>,
}

/// Samples host CPU, memory, and network traffic via sysinfo
pub struct SystemSampler {
    state: Mutex<SamplerState>,
}

impl SystemSampler {
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        Self {
            state: Mutex::new(SamplerState {
                sys,
                networks: Networks::new_with_refreshed_list(),
                last_net: None,
            }),
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sampler for SystemSampler {
    async fn sample(&self) -> Vec<Sample> {
        let timestamp = chrono::Utc::now().timestamp();

        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Sampler state lock poisoned");
                return super::sentinel_set(timestamp);
            }
        };

        state.sys.refresh_cpu_usage();
        state.sys.refresh_memory();
        state.networks.refresh();

        let cpu = f64::from(state.sys.global_cpu_info().cpu_usage());

        let total_mem = state.sys.total_memory();
        let memory = if total_mem > 0 {
            Sample::new(
                Metric::Memory,
                state.sys.used_memory() as f64 / total_mem as f64 * 100.0,
                timestamp,
            )
        } else {
            Sample::unavailable(Metric::Memory, timestamp)
        };

        let total_bytes: u64 = state
            .networks
            .iter()
            .map(|(_, data)| data.total_received() + data.total_transmitted())
            .sum();
        let now = Instant::now();
        let traffic = match state.last_net {
            Some((at, prev)) if now > at => {
                let elapsed = now.duration_since(at).as_secs_f64();
                let rate_kib_s = total_bytes.saturating_sub(prev) as f64 / elapsed / 1024.0;
                Sample::new(Metric::Traffic, rate_kib_s, timestamp)
            }
            // No prior reading, no rate to report yet
            _ => Sample::unavailable(Metric::Traffic, timestamp),
        };
        state.last_net = Some((now, total_bytes));

        vec![Sample::new(Metric::Cpu, cpu, timestamp), memory, traffic]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_one_sample_per_metric() {
        let sampler = SystemSampler::new();
        let samples = sampler.sample().await;

        assert_eq!(samples.len(), Metric::ALL.len());
        for (sample, metric) in samples.iter().zip(Metric::ALL.iter()) {
            assert_eq!(sample.metric, *metric);
        }
    }

    #[tokio::test]
    async fn test_first_traffic_reading_is_sentinel() {
        let sampler = SystemSampler::new();
        let samples = sampler.sample().await;
        let traffic = samples
            .iter()
            .find(|s| s.metric == Metric::Traffic)
            .unwrap();
        assert!(!traffic.available);
    }

    #[tokio::test]
    async fn test_second_traffic_reading_has_rate() {
        let sampler = SystemSampler::new();
        sampler.sample().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let samples = sampler.sample().await;

        let traffic = samples
            .iter()
            .find(|s| s.metric == Metric::Traffic)
            .unwrap();
        assert!(traffic.available);
        assert!(traffic.value >= 0.0);
    }

    #[tokio::test]
    async fn test_percent_metrics_in_plausible_range() {
        let sampler = SystemSampler::new();
        let samples = sampler.sample().await;

        for sample in samples.iter().filter(|s| s.available) {
            match sample.metric {
                Metric::Cpu | Metric::Memory => {
                    assert!((0.0..=100.0).contains(&sample.value), "{:?}", sample)
                }
                Metric::Traffic => assert!(sample.value >= 0.0),
            }
        }
    }
}
