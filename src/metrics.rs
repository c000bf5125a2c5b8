//! Per-interval sample recorded by the native sampler.
//!
//! A [`Sample`] holds one value for every column the native sampler can
//! emit; [`Sample::values`] picks out the columns of one metric group in
//! the order [`MetricSet::columns`] names them.

use crate::collectors::CpuUsage;
use crate::sampler::MetricSet;

/// One row of a native capture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    // ===== CPU (percent of the interval) =====
    pub cpu: CpuUsage,

    // ===== Disk I/O (bytes during the interval) =====
    pub disk_read_bytes: u64,
    pub disk_write_bytes: u64,

    // ===== Memory (bytes) =====
    /// Total minus free, buffers and cache
    pub mem_used: u64,
    pub mem_free: u64,
    pub mem_buffers: u64,
    pub mem_cached: u64,

    // ===== Thermal =====
    /// CPU temperature in Celsius, 0 when no sensor is readable
    pub temp_celsius: f64,

    // ===== Load Averages =====
    pub load_avg_1: f64,
    pub load_avg_5: f64,
    pub load_avg_15: f64,
}

impl Sample {
    /// Formatted values of one metric group.
    pub fn values(&self, metric: MetricSet) -> Vec<String> {
        match metric {
            MetricSet::Cpu => vec![
                format!("{:.3}", self.cpu.user),
                format!("{:.3}", self.cpu.system),
                format!("{:.3}", self.cpu.idle),
                format!("{:.3}", self.cpu.wait),
            ],
            MetricSet::Disk => vec![
                self.disk_read_bytes.to_string(),
                self.disk_write_bytes.to_string(),
            ],
            MetricSet::Memory => vec![
                self.mem_used.to_string(),
                self.mem_free.to_string(),
                self.mem_buffers.to_string(),
                self.mem_cached.to_string(),
            ],
            MetricSet::Thermal => vec![format!("{:.1}", self.temp_celsius)],
            MetricSet::Load => vec![
                format!("{:.2}", self.load_avg_1),
                format!("{:.2}", self.load_avg_5),
                format!("{:.2}", self.load_avg_15),
            ],
        }
    }

    /// Formatted values of all requested groups, in request order.
    pub fn record(&self, metrics: &[MetricSet]) -> Vec<String> {
        metrics.iter().flat_map(|&m| self.values(m)).collect()
    }
}
