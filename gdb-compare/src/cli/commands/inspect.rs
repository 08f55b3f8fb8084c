//! Inspect command handler: print the normalized content of one document

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::config::CompareOptions;
use crate::schema::{Entity, WorkspaceSchema};
use crate::xml::SchemaDocument;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Schema document (XML workspace export)
    pub doc: PathBuf,

    /// Print the normalized entities as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_inspect_command(args: InspectArgs) -> Result<()> {
    let doc = SchemaDocument::from_path(&args.doc)
        .with_context(|| format!("Failed to load schema: {}", args.doc.display()))?;
    let schema = WorkspaceSchema::parse(&doc, &CompareOptions::default())
        .with_context(|| format!("Failed to normalize schema: {}", args.doc.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;
        println!("{}", json);
        return Ok(());
    }

    print_names("Feature Datasets", &schema.feature_datasets);
    print_names("Feature Classes", &schema.feature_classes);
    print_names("Tables", &schema.tables);
    print_names("Relationship Classes", &schema.relationship_classes);
    print_names("Domains", &schema.domains);
    print_names("Topologies", &schema.topologies);
    print_names("Attribute Rules", &schema.attribute_rules);
    Ok(())
}

fn print_names<T: Entity>(title: &str, items: &[T]) {
    println!("{} ({})", title.bold(), items.len());
    for item in items {
        println!("  {}", item.identity());
    }
}
