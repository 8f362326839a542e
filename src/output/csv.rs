use std::path::Path;

use ::csv::WriterBuilder;
use anyhow::{Context, Result};
use tracing::debug;

use super::ensure_parent;
use crate::statistics::ReportTable;

/// Writes the statistics report as CSV, replacing any existing file.
pub fn write_report(table: &ReportTable, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    debug!(path = %path.display(), rows = table.rows.len(), "Writing CSV report");

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    writer.write_record(table.headers)?;
    for row in table.to_string_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{statistics, temp_dir};
    use crate::statistics::project;
    use std::fs;

    #[test]
    fn test_write_report_header_and_rows() {
        let dir = temp_dir("unistats_test_csv_report");
        let path = dir.join("nested/report.csv");

        write_report(&project(&statistics()), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Study Profile,Average Exam Score,Student Count,University Count,University Names",
                "Physics,4.50,1,1,Alpha <University>",
                "Medicine,,0,1,",
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_report_quotes_joined_names() {
        let dir = temp_dir("unistats_test_csv_quotes");
        let path = dir.join("report.csv");
        let mut entries = statistics();
        entries[0].university_names = vec!["Alpha".into(), "Beta".into()];

        write_report(&project(&entries), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Alpha, Beta\""));

        fs::remove_dir_all(&dir).unwrap();
    }
}
