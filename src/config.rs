//! Command-line configuration for statgraph.
//!
//! Every argument defaults to the fixed paths and parameters of the
//! classic `dstat` + `gnuplot` capture, so running `statgraph` with no
//! flags samples for two minutes and drops the report in the current
//! directory.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Capture system metrics and render them into an HTML graph report.
///
/// statgraph samples CPU, disk, memory, thermal and load metrics for a
/// fixed window, plots every metric column against the sample index and
/// writes a single HTML page embedding all of the plots.
///
/// # Examples
///
/// ```bash
/// # Two minutes of dstat samples, plotted with gnuplot
/// statgraph
///
/// # Use the built-in sampler for 30 samples and look at them in the terminal
/// statgraph --sampler native -n 30 --preview
///
/// # Re-plot an existing capture into another directory
/// statgraph --reuse-capture --output-dir /tmp/report
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Capture system metrics and render them as an HTML graph report")]
pub struct Config {
    /// Path the sampler writes its raw CSV capture to.
    #[arg(long, default_value = "/tmp/graph")]
    pub capture_file: PathBuf,

    /// Path of the index-prefixed data file fed to the plotter.
    #[arg(long, default_value = "/tmp/graph.dat")]
    pub data_file: PathBuf,

    /// Path of the generated plotting script.
    #[arg(long, default_value = "/tmp/graph.plt")]
    pub script_file: PathBuf,

    /// Directory receiving the numbered PNG images and the report.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name of the HTML report inside the output directory.
    #[arg(short, long, default_value = "report.html")]
    pub report_file: String,

    /// Number of samples to capture.
    #[arg(short = 'n', long, default_value_t = 120)]
    pub samples: u32,

    /// Interval in seconds between samples.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Which sampler produces the capture.
    #[arg(long, value_enum, default_value_t = SamplerKind::Dstat)]
    pub sampler: SamplerKind,

    /// Executable used by the dstat sampler.
    #[arg(long, default_value = "dstat")]
    pub sampler_bin: String,

    /// Executable used to render the plotting script.
    #[arg(long, default_value = "gnuplot")]
    pub plotter_bin: String,

    /// Skip sampling and build the report from an existing capture file.
    #[arg(long)]
    pub reuse_capture: bool,

    /// Show the captured series in a terminal dashboard after the report is written.
    #[arg(long)]
    pub preview: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Source of the raw capture.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    /// Run the external `dstat` tool.
    Dstat,
    /// Read `/proc` and `/sys` directly.
    Native,
}

impl Config {
    /// Time between two samples.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Full path of the HTML report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}
