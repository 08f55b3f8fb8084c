//! CSV export of all categories into a single flat file

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::category_rows;
use crate::diff::ComparisonReport;

/// Export every difference row, prefixed with its category
pub fn export_to_csv(report: &ComparisonReport, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(["Category", "Entity Name", "Difference", "Base", "Test"])
        .context("Failed to write CSV header")?;

    for category in report.with_differences() {
        let sheet = category.category.sheet_name();
        for row in category_rows(category).iter().flatten() {
            wtr.write_record([sheet, row.entity, row.difference.as_str(), row.base, row.test])
                .with_context(|| format!("Failed to write row for {}", row.entity))?;
        }
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    log::info!("CSV report exported to: {}", path.display());
    Ok(())
}
