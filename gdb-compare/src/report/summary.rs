//! Console summary of a comparison

use colored::*;

use crate::diff::ComparisonReport;

/// Print per-category counts to stdout
pub fn print_summary(report: &ComparisonReport) {
    println!("{}", "Schema comparison".bold());

    for category in &report.categories {
        let name = format!("{:<22}", category.category.sheet_name());
        if category.is_empty() {
            println!("  {} {}", name, "no differences".dimmed());
            continue;
        }

        println!(
            "  {} {} missing, {} mismatched ({} differences), {} additional",
            name.bold(),
            category.missing.len().to_string().red(),
            category.mismatched.len().to_string().yellow(),
            category.mismatched.difference_count(),
            category.additional.len().to_string().green()
        );
    }

    for category in &report.skipped {
        println!("  {:<22} {}", category.sheet_name(), "skipped".dimmed());
    }

    if report.has_differences() {
        println!("{} {}", "Total rows:".bold(), report.total_rows());
    } else {
        println!("{}", "There were no differences found between schemas.".green());
    }
}
