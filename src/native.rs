//! Built-in sampler reading `/proc` and `/sys` directly.
//!
//! Produces a capture with the same layout `dstat --output` uses, so the
//! rest of the pipeline cannot tell the two apart:
//!
//! ```text
//!
//! "statgraph native CSV output","Date:","19-10-2026 12:00:00"
//! "total cpu usage","","","","dsk/total","",...
//! "usr","sys","idl","wai","read","writ",...
//! 3.125,1.000,95.875,0.000,0,4096,...
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use sysinfo::System;

use crate::collectors::{self, CpuTimes, DiskStats};
use crate::error::{ReportError, Result};
use crate::metrics::Sample;
use crate::sampler::{CaptureRequest, MetricSet, MetricsSampler};

/// Sampler that needs no external tool.
#[derive(Clone, Debug, Default)]
pub struct NativeSampler;

impl NativeSampler {
    pub fn new() -> Self {
        Self
    }

    /// Group header record: each title followed by blanks to span its columns.
    fn group_header(metrics: &[MetricSet]) -> Vec<&'static str> {
        metrics
            .iter()
            .flat_map(|m| {
                std::iter::once(m.title()).chain(std::iter::repeat("").take(m.columns().len() - 1))
            })
            .collect()
    }

    /// Column header record.
    fn column_header(metrics: &[MetricSet]) -> Vec<&'static str> {
        metrics
            .iter()
            .flat_map(|m| m.columns().iter().copied())
            .collect()
    }
}

/// Counter snapshots carried from one interval to the next.
struct Baseline {
    cpu: CpuTimes,
    disk: DiskStats,
}

impl Baseline {
    fn read() -> Self {
        Self {
            cpu: collectors::read_cpu_times().unwrap_or_default(),
            disk: collectors::read_disk_stats().unwrap_or_default(),
        }
    }

    /// Take a new sample and move the baseline forward.
    fn sample(&mut self, sys: &mut System) -> Sample {
        let current = Self::read();
        let cpu = self.cpu.delta(&current.cpu).usage();
        let disk = self.disk.delta(&current.disk);
        *self = current;

        sys.refresh_memory();
        let meminfo = collectors::read_meminfo();
        let load = System::load_average();

        Sample {
            cpu,
            disk_read_bytes: disk.read_bytes(),
            disk_write_bytes: disk.written_bytes(),
            mem_used: sys
                .total_memory()
                .saturating_sub(sys.free_memory())
                .saturating_sub(meminfo.buffers)
                .saturating_sub(meminfo.cached),
            mem_free: sys.free_memory(),
            mem_buffers: meminfo.buffers,
            mem_cached: meminfo.cached,
            temp_celsius: collectors::read_temperature().unwrap_or(0.0),
            load_avg_1: load.one,
            load_avg_5: load.five,
            load_avg_15: load.fifteen,
        }
    }
}

impl MetricsSampler for NativeSampler {
    fn name(&self) -> &str {
        "native"
    }

    fn capture(&self, request: &CaptureRequest, dest: &Path) -> Result<()> {
        let mut file = File::create(dest).map_err(|e| ReportError::file(dest, e))?;
        writeln!(file).map_err(|e| ReportError::file(dest, e))?;

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(file);

        let started = Local::now().format("%d-%m-%Y %H:%M:%S").to_string();
        writer.write_record(["statgraph native CSV output", "Date:", started.as_str()])?;
        writer.write_record(Self::group_header(&request.metrics))?;
        writer.write_record(Self::column_header(&request.metrics))?;
        writer.flush()?;

        let mut sys = System::new();
        let mut baseline = Baseline::read();
        for n in 0..request.samples {
            std::thread::sleep(request.interval);
            let sample = baseline.sample(&mut sys);
            writer.write_record(sample.record(&request.metrics))?;
            writer.flush()?;
            log::trace!("sample {} of {} written", n + 1, request.samples);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::capture::read_capture;

    #[test]
    fn group_header_spans_columns() {
        let header = NativeSampler::group_header(&[MetricSet::Disk, MetricSet::Thermal]);
        assert_eq!(header, vec!["dsk/total", "", "thermal"]);
    }

    #[test]
    fn capture_parses_back_into_table() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("graph");
        let request = CaptureRequest {
            metrics: MetricSet::ALL.to_vec(),
            interval: Duration::ZERO,
            samples: 3,
        };

        NativeSampler::new().capture(&request, &dest).unwrap();
        let table = read_capture(&dest).unwrap();

        assert_eq!(table.headers, NativeSampler::column_header(&request.metrics));
        assert_eq!(table.rows.len(), 3);
        for row in &table.rows {
            assert_eq!(row.split(',').count(), table.headers.len());
            assert!(!row.contains('"'));
        }
    }
}
