//! Runs every category differ in a fixed order and collects the results

use serde::Serialize;

use crate::config::{CompareOptions, IgnoreOption};
use crate::error::Result;
use crate::schema::WorkspaceSchema;
use crate::xml::SchemaDocument;

use super::{
    diff_attribute_rules, diff_datasets, diff_domains, diff_feature_datasets,
    diff_relationship_classes, diff_topologies, Category, CategoryReport,
};

/// Full comparison outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    /// One entry per compared category, in comparison order
    pub categories: Vec<CategoryReport>,
    /// Categories left out by ignore options
    pub skipped: Vec<Category>,
}

impl ComparisonReport {
    /// Whether any category produced a difference; gates report creation
    pub fn has_differences(&self) -> bool {
        self.categories.iter().any(|c| !c.is_empty())
    }

    /// Categories that have something to report
    pub fn with_differences(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| !c.is_empty())
    }

    #[cfg(test)]
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn total_rows(&self) -> usize {
        self.categories.iter().map(CategoryReport::row_count).sum()
    }
}

/// Normalize both documents and compare them
pub fn compare_documents(
    base: &SchemaDocument,
    test: &SchemaDocument,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    log::info!("Normalizing base schema");
    let base = WorkspaceSchema::parse(base, options)?;
    log::info!("Normalizing test schema");
    let test = WorkspaceSchema::parse(test, options)?;

    Ok(compare_schemas(&base, &test, options))
}

/// Compare two normalized schemas category by category
pub fn compare_schemas(
    base: &WorkspaceSchema,
    test: &WorkspaceSchema,
    options: &CompareOptions,
) -> ComparisonReport {
    let mut report = ComparisonReport::default();

    log::info!("Comparing feature datasets");
    report.push(
        diff_feature_datasets(&base.feature_datasets, &test.feature_datasets)
            .into_report(Category::FeatureDatasets),
    );

    log::info!("Comparing feature classes");
    report.push(
        diff_datasets(&base.feature_classes, &test.feature_classes, Category::FeatureClasses)
            .into_report(Category::FeatureClasses),
    );

    log::info!("Comparing tables");
    report.push(
        diff_datasets(&base.tables, &test.tables, Category::Tables).into_report(Category::Tables),
    );

    log::info!("Comparing relationship classes");
    report.push(
        diff_relationship_classes(&base.relationship_classes, &test.relationship_classes)
            .into_report(Category::RelationshipClasses),
    );

    if options.ignores(IgnoreOption::Domains) {
        log::info!("Skipping domains");
        report.skipped.push(Category::Domains);
    } else {
        log::info!("Comparing domains");
        report.push(diff_domains(&base.domains, &test.domains).into_report(Category::Domains));
    }

    if options.ignores(IgnoreOption::Topology) {
        log::info!("Skipping topologies");
        report.skipped.push(Category::Topologies);
    } else {
        log::info!("Comparing topologies");
        report.push(
            diff_topologies(&base.topologies, &test.topologies).into_report(Category::Topologies),
        );
    }

    log::info!("Comparing attribute rules");
    report.push(
        diff_attribute_rules(&base.attribute_rules, &test.attribute_rules)
            .into_report(Category::AttributeRules),
    );

    if report.has_differences() {
        log::info!("Differences found in {} categories", report.with_differences().count());
    } else {
        log::info!("There were no differences found between schemas");
    }

    report
}

impl ComparisonReport {
    fn push(&mut self, category: CategoryReport) {
        log::debug!(
            "{}: {} missing, {} mismatched, {} additional",
            category.category,
            category.missing.len(),
            category.mismatched.len(),
            category.additional.len()
        );
        self.categories.push(category);
    }
}
