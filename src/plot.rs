//! Plot command generation and gnuplot script emission.
//!
//! Every header column gets its own plot, drawn against the synthetic row
//! index in column 1 of the data file, and rendered to `<n>.png`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{ReportError, Result};

/// One series rendering instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotCommand {
    /// Data file holding the index-prefixed rows
    pub data_file: PathBuf,
    /// 1-based column plotted on the Y axis
    pub column: usize,
    /// Legend label
    pub title: String,
}

impl fmt::Display for PlotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plot \"{}\" using 1:{} title \"{}\" with lines",
            self.data_file.display(),
            self.column,
            self.title
        )
    }
}

/// Build one plot command per header, in header order.
///
/// Header `i` (1-based) is column `i + 1` of the data file since column 1
/// is the row index.
pub fn plot_commands(headers: &[String], data_file: &Path) -> Vec<PlotCommand> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| PlotCommand {
            data_file: data_file.to_path_buf(),
            column: i + 2,
            title: header.clone(),
        })
        .collect()
}

/// Name of the image produced by the `n`-th command.
pub fn image_name(n: usize) -> String {
    format!("{}.png", n)
}

/// Render the full gnuplot script for `commands`.
pub fn render_script(commands: &[PlotCommand]) -> String {
    let mut script = String::from("set datafile separator \",\"\n");
    for (n, command) in commands.iter().enumerate() {
        script.push_str("set terminal png\n");
        script.push_str(&format!("set output \"{}\"\n", image_name(n)));
        script.push_str(&format!("{}\n", command));
    }
    script
}

/// Write the gnuplot script for `commands` to `path`, replacing any old one.
pub fn write_script(commands: &[PlotCommand], path: &Path) -> Result<()> {
    std::fs::write(path, render_script(commands)).map_err(|e| ReportError::file(path, e))
}

/// Something that turns a plotting script into image files.
pub trait ChartRenderer {
    /// Run `script`, leaving the images it names in `output_dir`.
    ///
    /// Only failing to run the renderer at all is an error.
    fn render(&self, script: &Path, output_dir: &Path) -> Result<()>;
}

/// Renderer backed by the external `gnuplot` command.
#[derive(Clone, Debug)]
pub struct GnuplotRenderer {
    program: String,
}

impl GnuplotRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ChartRenderer for GnuplotRenderer {
    fn render(&self, script: &Path, output_dir: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(script)
            .current_dir(output_dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| ReportError::Launch {
                tool: self.program.clone(),
                source,
            })?;

        // gnuplot rejects empty data sets; the report still lists every image
        if !status.success() {
            log::warn!("{} exited with {}", self.program, status);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_command_per_header_shifted_by_index_column() {
        let commands = plot_commands(
            &headers(&["total cpu usage", "read", "write"]),
            Path::new("/tmp/graph.dat"),
        );
        let columns: Vec<usize> = commands.iter().map(|c| c.column).collect();
        assert_eq!(columns, vec![2, 3, 4]);
        assert_eq!(commands[0].title, "total cpu usage");
    }

    #[test]
    fn command_text() {
        let commands = plot_commands(&headers(&["usr"]), Path::new("/tmp/graph.dat"));
        assert_eq!(
            commands[0].to_string(),
            "plot \"/tmp/graph.dat\" using 1:2 title \"usr\" with lines"
        );
    }

    #[test]
    fn script_numbers_images_in_order() {
        let commands = plot_commands(&headers(&["a", "b"]), Path::new("d.dat"));
        let expected = "set datafile separator \",\"\n\
                        set terminal png\n\
                        set output \"0.png\"\n\
                        plot \"d.dat\" using 1:2 title \"a\" with lines\n\
                        set terminal png\n\
                        set output \"1.png\"\n\
                        plot \"d.dat\" using 1:3 title \"b\" with lines\n";
        assert_eq!(render_script(&commands), expected);
    }

    #[test]
    fn no_headers_means_no_plots() {
        let commands = plot_commands(&[], Path::new("d.dat"));
        assert!(commands.is_empty());
        assert_eq!(render_script(&commands), "set datafile separator \",\"\n");
    }

    #[test]
    fn missing_plotter_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("graph.plt");
        write_script(&[], &script).unwrap();

        let err = GnuplotRenderer::new("statgraph-no-such-plotter")
            .render(&script, dir.path())
            .unwrap_err();
        assert!(matches!(err, ReportError::Launch { .. }));
    }

    #[test]
    fn failing_plotter_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("graph.plt");
        write_script(&[], &script).unwrap();

        GnuplotRenderer::new("false")
            .render(&script, dir.path())
            .unwrap();
    }
}
