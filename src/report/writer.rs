//! Write the summary document to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ReportError;

/// File name for a given day's summary: `work-summary-YYYY-MM-DD.md`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("work-summary-{}.md", date.format("%Y-%m-%d"))
}

/// Write `document` into `dir`, creating the directory if needed.
///
/// The content is written to a temp file in `dir` and then moved over the
/// final path, so an existing summary for the same day is replaced whole.
pub fn write_report(dir: &Path, date: NaiveDate, document: &str) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(report_file_name(date));
    let write_failed = |source: std::io::Error| ReportError::WriteFailed {
        path: path.clone(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_failed)?;
    file.write_all(document.as_bytes()).map_err(write_failed)?;
    file.flush().map_err(write_failed)?;

    // Temp files are created owner-only; reports should read like normal files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }

    file.persist(&path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = document.len(), "Wrote summary");
    Ok(path)
}
