//! Capture-to-report pipeline.
//!
//! The [`Pipeline`] runs the steps in order and stops at the first error:
//!
//! 1. sample into the capture file (unless an existing capture is reused)
//! 2. split the capture into headers and rows, write the data file
//! 3. build one plot command per header and write the plotting script
//! 4. render the script into numbered images
//! 5. write the HTML report referencing every image

use std::path::{Path, PathBuf};

use crate::capture::{self, CaptureTable};
use crate::config::{Config, SamplerKind};
use crate::error::{ReportError, Result};
use crate::native::NativeSampler;
use crate::plot::{self, ChartRenderer, GnuplotRenderer, PlotCommand};
use crate::report;
use crate::sampler::{CaptureRequest, DstatSampler, MetricsSampler};

/// What a finished run produced.
#[derive(Clone, Debug)]
pub struct ReportSummary {
    /// Parsed capture
    pub table: CaptureTable,
    /// Plot commands, one per header
    pub commands: Vec<PlotCommand>,
    /// Images the plotting script names, in header order
    pub images: Vec<PathBuf>,
    /// The HTML report
    pub report: PathBuf,
}

/// Runs a capture and turns it into a report.
pub struct Pipeline {
    config: Config,
    sampler: Box<dyn MetricsSampler>,
    renderer: Box<dyn ChartRenderer>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        sampler: Box<dyn MetricsSampler>,
        renderer: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            sampler,
            renderer,
        }
    }

    /// Build a pipeline with the sampler and renderer named in `config`.
    pub fn from_config(config: Config) -> Self {
        let sampler: Box<dyn MetricsSampler> = match config.sampler {
            SamplerKind::Dstat => Box::new(DstatSampler::new(config.sampler_bin.clone())),
            SamplerKind::Native => Box::new(NativeSampler::new()),
        };
        let renderer = Box::new(GnuplotRenderer::new(config.plotter_bin.clone()));
        Self::new(config, sampler, renderer)
    }

    fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            interval: self.config.interval(),
            samples: self.config.samples,
            ..CaptureRequest::default()
        }
    }

    /// Run every step and return what was produced.
    pub fn run(&self) -> Result<ReportSummary> {
        let config = &self.config;

        if config.reuse_capture {
            log::info!("Reusing capture {}", config.capture_file.display());
        } else {
            let request = self.capture_request();
            log::info!(
                "Sampling with {} for {} x {}s into {}",
                self.sampler.name(),
                request.samples,
                request.interval.as_secs(),
                config.capture_file.display()
            );
            self.sampler.capture(&request, &config.capture_file)?;
        }

        let table = capture::read_capture(&config.capture_file)?;
        log::info!(
            "Capture has {} columns and {} rows",
            table.headers.len(),
            table.rows.len()
        );

        table.write_data_file(&config.data_file)?;

        // The renderer runs inside the output directory
        let data_file = absolute(&config.data_file)?;
        let commands = plot::plot_commands(&table.headers, &data_file);
        plot::write_script(&commands, &config.script_file)?;
        log::info!(
            "Wrote {} plot commands to {}",
            commands.len(),
            config.script_file.display()
        );

        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| ReportError::file(&config.output_dir, e))?;
        let script_file = absolute(&config.script_file)?;
        self.renderer.render(&script_file, &config.output_dir)?;

        let images: Vec<PathBuf> = (0..commands.len())
            .map(|n| config.output_dir.join(plot::image_name(n)))
            .collect();

        let report = config.report_path();
        report::write_report(images.len(), &report)?;
        log::info!("Report with {} images written to {}", images.len(), report.display());

        Ok(ReportSummary {
            table,
            commands,
            images,
            report,
        })
    }
}

/// Resolve `path` against the current directory if it is relative.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
