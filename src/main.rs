//! # statgraph
//!
//! Capture system metrics over a fixed window and turn them into an HTML
//! page of graphs.
//!
//! ## Overview
//!
//! `statgraph` runs a sampler (the external `dstat` tool by default, or a
//! built-in `/proc` reader) for 120 one-second samples of CPU, disk,
//! memory, thermal and load metrics. Every metric column of the capture is
//! then plotted against the sample index with `gnuplot`, one PNG per
//! column, and a static HTML report embeds all of them in column order.
//!
//! Any failure aborts the run: there is no retry and no partial report.
//!
//! ## Usage
//!
//! ```bash
//! # Default capture: dstat, 120 x 1s, report in the current directory
//! statgraph
//!
//! # Built-in sampler, short capture, terminal preview afterwards
//! statgraph --sampler native -n 20 --preview
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`sampler`]: Sampler capability and the `dstat` sampler
//! - [`native`]: Built-in sampler
//! - [`collectors`]: Readers for `/proc` and `/sys` counters
//! - [`metrics`]: Sample rows written by the built-in sampler
//! - [`capture`]: Header and row extraction
//! - [`plot`]: Plot commands, gnuplot script and renderer
//! - [`report`]: HTML report
//! - [`pipeline`]: Step orchestration
//! - [`preview`]: Terminal preview

mod capture;
mod collectors;
mod config;
mod error;
mod metrics;
mod native;
mod pipeline;
mod plot;
mod preview;
mod report;
mod sampler;

use clap::Parser;

use config::Config;
use error::Result;
use pipeline::Pipeline;

fn main() {
    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    let preview = config.preview;
    let summary = Pipeline::from_config(config).run()?;
    for (image, command) in summary.images.iter().zip(&summary.commands) {
        log::debug!("{}: {}", image.display(), command);
    }

    if preview {
        if preview::is_terminal() {
            preview::run(&summary.table)?;
        } else {
            log::warn!("stdout is not a TTY, skipping preview");
        }
    }

    log::info!("Done, open {}", summary.report.display());

    Ok(())
}

/// Log to stderr, `info` by default, `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
