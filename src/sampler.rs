//! Metrics sampler capability.
//!
//! A sampler runs for `interval × samples` and leaves a raw CSV capture at
//! a given path. [`DstatSampler`] drives the external `dstat` tool; the
//! built-in alternative lives in [`crate::native`].

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::{ReportError, Result};

/// A group of metrics the sampler is asked to record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricSet {
    Cpu,
    Disk,
    Memory,
    Thermal,
    Load,
}

impl MetricSet {
    /// Every metric group, in capture order.
    pub const ALL: [MetricSet; 5] = [
        MetricSet::Cpu,
        MetricSet::Disk,
        MetricSet::Memory,
        MetricSet::Thermal,
        MetricSet::Load,
    ];

    /// Command line flag enabling this group in `dstat`.
    pub fn dstat_flag(self) -> &'static str {
        match self {
            MetricSet::Cpu => "--cpu",
            MetricSet::Disk => "--disk",
            MetricSet::Memory => "--mem",
            MetricSet::Thermal => "--thermal",
            MetricSet::Load => "--load",
        }
    }

    /// Group header written above the group's columns.
    pub fn title(self) -> &'static str {
        match self {
            MetricSet::Cpu => "total cpu usage",
            MetricSet::Disk => "dsk/total",
            MetricSet::Memory => "memory usage",
            MetricSet::Thermal => "thermal",
            MetricSet::Load => "load avg",
        }
    }

    /// Column names of the group, as `dstat` labels them.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            MetricSet::Cpu => &["usr", "sys", "idl", "wai"],
            MetricSet::Disk => &["read", "writ"],
            MetricSet::Memory => &["used", "free", "buff", "cach"],
            MetricSet::Thermal => &["temp"],
            MetricSet::Load => &["1m", "5m", "15m"],
        }
    }
}

/// What to sample and for how long.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    pub metrics: Vec<MetricSet>,
    pub interval: Duration,
    pub samples: u32,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            metrics: MetricSet::ALL.to_vec(),
            interval: Duration::from_secs(1),
            samples: 120,
        }
    }
}

/// Something that can record a raw metrics capture to a file.
pub trait MetricsSampler {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Sample according to `request`, creating or overwriting `dest`.
    ///
    /// Blocks for the whole capture window.
    fn capture(&self, request: &CaptureRequest, dest: &Path) -> Result<()>;
}

/// Sampler backed by the external `dstat` command.
#[derive(Clone, Debug)]
pub struct DstatSampler {
    program: String,
}

impl DstatSampler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to `dstat` for a request.
    fn args(request: &CaptureRequest, dest: &Path) -> Vec<String> {
        let mut args: Vec<String> = request
            .metrics
            .iter()
            .map(|m| m.dstat_flag().to_string())
            .collect();
        args.push("--output".into());
        args.push(dest.display().to_string());
        args.push(request.interval.as_secs().to_string());
        args.push(request.samples.to_string());
        args
    }
}

impl MetricsSampler for DstatSampler {
    fn name(&self) -> &str {
        &self.program
    }

    fn capture(&self, request: &CaptureRequest, dest: &Path) -> Result<()> {
        // dstat appends to an existing --output file
        match std::fs::remove_file(dest) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ReportError::file(dest, e)),
        }

        let status = Command::new(&self.program)
            .args(Self::args(request, dest))
            .stdout(Stdio::null())
            .status()
            .map_err(|source| ReportError::Launch {
                tool: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ReportError::ToolFailed {
                tool: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dstat_args_for_default_request() {
        let args = DstatSampler::args(&CaptureRequest::default(), Path::new("/tmp/graph"));
        assert_eq!(
            args,
            vec![
                "--cpu",
                "--disk",
                "--mem",
                "--thermal",
                "--load",
                "--output",
                "/tmp/graph",
                "1",
                "120"
            ]
        );
    }

    #[test]
    fn dstat_args_follow_requested_metrics() {
        let request = CaptureRequest {
            metrics: vec![MetricSet::Load, MetricSet::Cpu],
            interval: Duration::from_secs(5),
            samples: 3,
        };
        let args = DstatSampler::args(&request, Path::new("out.csv"));
        assert_eq!(
            args,
            vec!["--load", "--cpu", "--output", "out.csv", "5", "3"]
        );
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = DstatSampler::new("statgraph-no-such-sampler");
        let err = sampler
            .capture(&CaptureRequest::default(), &dir.path().join("graph"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Launch { .. }));
    }
}
