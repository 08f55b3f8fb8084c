//! Difference report export
//!
//! A [`ComparisonReport`] is flattened into rows of
//! `<entity> | difference | base | test`, in the same order for every output
//! format: missing entities, then each mismatched entity's differences, then
//! additional entities.

pub mod csv_exporter;
pub mod excel;
mod formatting;
mod helpers;
pub mod summary;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ReportFormat;
use crate::diff::{CategoryReport, ComparisonReport};
pub use helpers::try_open_file;

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow<'a> {
    pub entity: &'a str,
    pub difference: String,
    pub base: &'a str,
    pub test: &'a str,
}

/// Rows for one category. Each mismatched entity's rows are grouped so the
/// renderer can merge its name cell; missing and additional entities are one
/// group each.
pub fn category_rows(category: &CategoryReport) -> Vec<Vec<ReportRow<'_>>> {
    let label = category.category.entity_label();
    let mut groups = Vec::with_capacity(category.row_count());

    for name in &category.missing {
        groups.push(vec![ReportRow {
            entity: name,
            difference: format!("Missing {}", label),
            base: name,
            test: "",
        }]);
    }

    for (name, differences) in category.mismatched.iter() {
        groups.push(
            differences
                .iter()
                .map(|d| ReportRow {
                    entity: name,
                    difference: d.description.clone(),
                    base: &d.base,
                    test: &d.test,
                })
                .collect(),
        );
    }

    for name in &category.additional {
        groups.push(vec![ReportRow {
            entity: name,
            difference: format!("Additional {}", label),
            base: "",
            test: name,
        }]);
    }

    groups
}

/// Writes comparison reports to disk
pub struct ReportExporter;

impl ReportExporter {
    /// Export the report and open it with the platform default application
    pub fn export_and_open(report: &ComparisonReport, path: &Path, format: ReportFormat) -> Result<()> {
        Self::export(report, path, format)?;
        try_open_file(path);
        Ok(())
    }

    /// Export the report in the requested format
    pub fn export(report: &ComparisonReport, path: &Path, format: ReportFormat) -> Result<()> {
        match format {
            ReportFormat::Xlsx => excel::export_to_excel(report, path),
            ReportFormat::Csv => csv_exporter::export_to_csv(report, path),
            ReportFormat::Json => export_to_json(report, path),
        }
    }
}

/// Serialize the full report, including skipped categories
pub fn export_to_json(report: &ComparisonReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    log::info!("JSON report exported to: {}", path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diff::{Category, DiffMap, Difference};
    use std::path::PathBuf;

    pub fn make_category_report() -> CategoryReport {
        let mut mismatched = DiffMap::new();
        mismatched.push("Roads", Difference::new("Feature Class has mismatch HasZ property", "false", "true"));
        mismatched.push("Roads", Difference::missing("Missing field", "SPEED"));
        mismatched.push("Rivers", Difference::new("Feature Class has mismatch AliasName property", "River", "Rivers"));

        CategoryReport {
            category: Category::FeatureClasses,
            missing: vec!["Parcels".to_string()],
            mismatched,
            additional: vec!["Bridges".to_string()],
        }
    }

    pub fn make_report() -> ComparisonReport {
        let mut domains = DiffMap::new();
        domains.push(
            "Status",
            Difference::new("Domain has additional and missing CodedValues", "{2: 'Inactive'}", "{2: 'Retired'}"),
        );

        ComparisonReport {
            categories: vec![
                CategoryReport {
                    category: Category::FeatureDatasets,
                    missing: vec![],
                    mismatched: DiffMap::new(),
                    additional: vec![],
                },
                make_category_report(),
                CategoryReport {
                    category: Category::Domains,
                    missing: vec![],
                    mismatched: domains,
                    additional: vec![],
                },
            ],
            skipped: vec![Category::Topologies],
        }
    }

    pub fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gdb_compare_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_category_rows_order_and_columns() {
        let category = make_category_report();
        let groups = category_rows(&category);

        assert_eq!(groups.len(), 4);
        assert_eq!(
            groups[0],
            vec![ReportRow {
                entity: "Parcels",
                difference: "Missing Feature Class".to_string(),
                base: "Parcels",
                test: "",
            }]
        );
        // mismatches are keyed in name order
        assert_eq!(groups[1][0].entity, "Rivers");
        assert_eq!(groups[2].len(), 2);
        assert_eq!(groups[2][1].difference, "Missing field");
        assert_eq!(groups[2][1].base, "SPEED");
        assert_eq!(
            groups[3][0],
            ReportRow {
                entity: "Bridges",
                difference: "Additional Feature Class".to_string(),
                base: "",
                test: "Bridges",
            }
        );
    }

    #[test]
    fn test_json_export_contains_skipped_categories() {
        let path = temp_path("report.json");
        export_to_json(&make_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["skipped"][0], "Topologies");
        assert_eq!(value["categories"][1]["missing"][0], "Parcels");
        assert_eq!(
            value["categories"][1]["mismatched"]["Roads"][0]["base"],
            "false"
        );

        std::fs::remove_file(&path).ok();
    }
}
