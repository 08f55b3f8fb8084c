//! Compare command handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::config::{Config, ReportFormat};
use crate::diff::compare_documents;
use crate::report::summary::print_summary;
use crate::report::ReportExporter;
use crate::xml::SchemaDocument;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Base schema document (XML workspace export)
    pub base: PathBuf,

    /// Test schema document compared against the base
    pub test: PathBuf,

    /// Report file path (default: schema_diff_<timestamp>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Properties to ignore, separated by ';' or ','
    /// (e.g. "Field Alias;Has M;Domains")
    #[arg(long)]
    pub ignore: Option<String>,

    /// Also compare the Length property of non-text fields
    #[arg(long)]
    pub compare_non_text_length: bool,

    /// Report format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Open the report after writing it
    #[arg(long)]
    pub open: bool,

    /// Config file (default: ~/.config/gdb-compare/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Compare two schema documents and write a report when they differ
pub fn handle_compare_command(args: CompareArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    let mut options = config.compare_options(args.ignore.as_deref());
    if args.compare_non_text_length {
        options.ignore_non_text_field_length = false;
    }
    if !options.ignore.is_empty() {
        let names: Vec<String> = options.ignore.iter().map(|o| o.to_string()).collect();
        log::info!("Ignoring: {}", names.join(", "));
    }

    let base = SchemaDocument::from_path(&args.base)
        .with_context(|| format!("Failed to load base schema: {}", args.base.display()))?;
    let test = SchemaDocument::from_path(&args.test)
        .with_context(|| format!("Failed to load test schema: {}", args.test.display()))?;

    let report = compare_documents(&base, &test, &options).context("Failed to compare schemas")?;

    print_summary(&report);

    if !report.has_differences() {
        log::info!("There were no differences found between schemas.");
        return Ok(());
    }

    let format = args.format.unwrap_or(config.report.format);
    let path = args
        .output
        .unwrap_or_else(|| default_output_path(config.report.output_dir.as_deref(), format));

    if args.open || config.report.open_after_export {
        ReportExporter::export_and_open(&report, &path, format)?;
    } else {
        ReportExporter::export(&report, &path, format)?;
    }

    println!("{} {}", "Report written to".green(), path.display().to_string().cyan());
    Ok(())
}

/// `schema_diff_<YYYYmmdd_HHMMSS>.<ext>` in `dir`, or the current directory
pub fn default_output_path(dir: Option<&Path>, format: ReportFormat) -> PathBuf {
    let file_name = format!(
        "schema_diff_{}.{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/base.xml");
    const TEST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test.xml");

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gdb_compare_cli_{}_{}", std::process::id(), name))
    }

    /// Arguments with an empty config file so a user config never leaks in
    fn make_args(base: &str, test: &str, output: &Path, format: ReportFormat) -> CompareArgs {
        let config = temp_path(&format!("{}.toml", format.extension()));
        std::fs::write(&config, "").unwrap();

        CompareArgs {
            base: PathBuf::from(base),
            test: PathBuf::from(test),
            output: Some(output.to_path_buf()),
            ignore: None,
            compare_non_text_length: false,
            format: Some(format),
            open: false,
            config: Some(config),
        }
    }

    #[test]
    fn test_no_report_written_without_differences() {
        let output = temp_path("identical.xlsx");
        std::fs::remove_file(&output).ok();

        handle_compare_command(make_args(BASE, BASE, &output, ReportFormat::Xlsx)).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_report_written_when_schemas_differ() {
        let output = temp_path("different.csv");
        std::fs::remove_file(&output).ok();

        handle_compare_command(make_args(BASE, TEST, &output, ReportFormat::Csv)).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("Additional Table"));

        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let output = temp_path("missing.json");
        let args = make_args(BASE, "/nonexistent/test.xml", &output, ReportFormat::Json);

        assert!(handle_compare_command(args).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_default_output_path_in_current_dir() {
        let path = default_output_path(None, ReportFormat::Xlsx);
        let name = path.to_str().unwrap();

        assert!(name.starts_with("schema_diff_"));
        assert!(name.ends_with(".xlsx"));
        // schema_diff_YYYYmmdd_HHMMSS.xlsx
        assert_eq!(name.len(), "schema_diff_".len() + 15 + ".xlsx".len());
    }

    #[test]
    fn test_default_output_path_in_configured_dir() {
        let path = default_output_path(Some(Path::new("/tmp/reports")), ReportFormat::Csv);

        assert_eq!(path.parent(), Some(Path::new("/tmp/reports")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
    }
}
