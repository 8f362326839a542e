use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use super::{ExportDocument, ensure_dir};

/// Writes `document` as pretty-printed JSON into `dir` and returns the file path.
#[instrument(skip(document), fields(dir = %dir.display()))]
pub fn write_export(document: &ExportDocument<'_>, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(document.file_name("json"));

    let file = File::create(&path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;

    debug!(
        students = document.students.len(),
        universities = document.universities.len(),
        statistics = document.statistics.len(),
        "JSON export written"
    );
    Ok(path)
}
