//! Excel workbook export, one worksheet per category with differences

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::*;

use super::category_rows;
use super::formatting::*;
use crate::diff::{CategoryReport, ComparisonReport};

const HEADERS: [&str; 3] = ["Difference", "Base", "Test"];

/// Longest string a worksheet cell accepts
const MAX_CELL_CHARS: usize = 32_767;
const TRUNCATED_MARKER: &str = "... [truncated]";

/// Export the report to an Excel workbook
pub fn export_to_excel(report: &ComparisonReport, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    for category in report.with_differences() {
        create_category_sheet(&mut workbook, category)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel report exported to: {}", path.display());
    Ok(())
}

/// Create the worksheet for one category
fn create_category_sheet(workbook: &mut Workbook, category: &CategoryReport) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(category.category.sheet_name())?;

    let header_format = create_header_format();
    let merged_format = create_merged_name_format();

    sheet.write_string_with_format(
        0,
        0,
        &format!("{} Name", category.category.entity_label()),
        &header_format,
    )?;
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16 + 1, *header, &header_format)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let mut row = 1u32;
    for group in category_rows(category) {
        let Some(first) = group.first() else {
            continue;
        };
        let start_row = row;

        for entry in &group {
            sheet.write_string(row, 1, cell_text(&entry.difference, first.entity))?;
            sheet.write_string(row, 2, cell_text(entry.base, first.entity))?;
            sheet.write_string(row, 3, cell_text(entry.test, first.entity))?;
            row += 1;
        }

        if group.len() > 1 {
            sheet.merge_range(start_row, 0, row - 1, 0, first.entity, &merged_format)?;
        } else {
            sheet.write_string(start_row, 0, first.entity)?;
        }
    }

    sheet.autofit();
    Ok(())
}

/// Cut values that do not fit in a cell; the CSV and JSON reports keep them whole
fn cell_text<'a>(value: &'a str, entity: &str) -> Cow<'a, str> {
    if value.chars().count() <= MAX_CELL_CHARS {
        return Cow::Borrowed(value);
    }

    log::warn!(
        "Value for {} is longer than {} characters and was truncated in the workbook",
        entity,
        MAX_CELL_CHARS
    );
    let keep = MAX_CELL_CHARS - TRUNCATED_MARKER.chars().count();
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str(TRUNCATED_MARKER);
    Cow::Owned(truncated)
}
