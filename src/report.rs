//! HTML report assembly.

use std::path::Path;

use crate::error::{ReportError, Result};
use crate::plot::image_name;

/// Build the report page embedding images `0.png` up to `image_count - 1`.
pub fn render_report(image_count: usize) -> String {
    let mut html = String::from("<html>\n<body>\n");
    for n in 0..image_count {
        html.push_str(&format!("<img src=\"{}\"><p>\n", image_name(n)));
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Write the report page to `path`.
pub fn write_report(image_count: usize, path: &Path) -> Result<()> {
    std::fs::write(path, render_report(image_count)).map_err(|e| ReportError::file(path, e))
}
