use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use tracing::debug;

use super::ensure_parent;
use crate::statistics::{Cell, ReportTable};

pub const SHEET_NAME: &str = "Statistics";

/// Writes the statistics report as a single-sheet XLSX workbook.
///
/// Scores and counts are stored as numbers; an absent average leaves its cell
/// empty.
pub fn write_report(table: &ReportTable, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    debug!(path = %path.display(), rows = table.rows.len(), "Writing XLSX report");

    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_align(FormatAlign::VerticalCenter);
    let score_format = Format::new().set_num_format("0.00");

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .context("failed to create report sheet")?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Score(v) => {
                    worksheet.write_number_with_format(row_num, col, *v, &score_format)?;
                }
                Cell::Count(n) => {
                    worksheet.write_number(row_num, col, *n as f64)?;
                }
                Cell::Blank => {}
            }
        }
    }

    worksheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("failed to save '{}'", path.display()))?;
    Ok(())
}
