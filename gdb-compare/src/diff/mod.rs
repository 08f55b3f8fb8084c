//! Schema diff logic for comparing two normalized workspace schemas
//!
//! Every category differ has the same shape: given the base and test
//! collections it returns the entities missing from test, the entities added
//! in test, and a map from shared identity to the list of property
//! differences found on that entity.

pub mod aggregate;
pub mod attribute_rules;
pub mod datasets;
pub mod domains;
pub mod relationships;
pub mod topology;

pub use aggregate::{compare_documents, ComparisonReport};
pub use attribute_rules::diff_attribute_rules;
pub use datasets::{diff_datasets, diff_feature_datasets};
pub use domains::diff_domains;
pub use relationships::diff_relationship_classes;
pub use topology::diff_topologies;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::schema::{Entity, PropertyMap};

/// Entity categories, in the order they are compared and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    FeatureDatasets,
    FeatureClasses,
    Tables,
    RelationshipClasses,
    Domains,
    Topologies,
    AttributeRules,
}

impl Category {
    #[cfg(test)]
    pub const ALL: [Category; 7] = [
        Category::FeatureDatasets,
        Category::FeatureClasses,
        Category::Tables,
        Category::RelationshipClasses,
        Category::Domains,
        Category::Topologies,
        Category::AttributeRules,
    ];

    /// Plural label, also used as the worksheet name
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Category::FeatureDatasets => "Feature Datasets",
            Category::FeatureClasses => "Feature Classes",
            Category::Tables => "Tables",
            Category::RelationshipClasses => "Relationship Classes",
            Category::Domains => "Domains",
            Category::Topologies => "Topologies",
            Category::AttributeRules => "Attribute Rules",
        }
    }

    /// Singular label used in difference descriptions
    pub fn entity_label(&self) -> &'static str {
        match self {
            Category::FeatureDatasets => "Feature Dataset",
            Category::FeatureClasses => "Feature Class",
            Category::Tables => "Table",
            Category::RelationshipClasses => "Relationship Class",
            Category::Domains => "Domain",
            Category::Topologies => "Topology",
            Category::AttributeRules => "Attribute Rule",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// One difference on a shared entity: description, base value, test value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub description: String,
    pub base: String,
    pub test: String,
}

impl Difference {
    pub fn new(
        description: impl Into<String>,
        base: impl Into<String>,
        test: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            base: base.into(),
            test: test.into(),
        }
    }

    pub fn missing(description: impl Into<String>, base: impl Into<String>) -> Self {
        Self::new(description, base, "")
    }

    pub fn additional(description: impl Into<String>, test: impl Into<String>) -> Self {
        Self::new(description, "", test)
    }
}

/// Identity to ordered list of differences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffMap(BTreeMap<String, Vec<Difference>>);

impl DiffMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the entity's list, creating it if needed
    pub fn push(&mut self, identity: &str, difference: Difference) {
        self.0
            .entry(identity.to_string())
            .or_default()
            .push(difference);
    }

    /// Append several differences; nothing is recorded for an empty list
    pub fn extend(&mut self, identity: &str, differences: Vec<Difference>) {
        for difference in differences {
            self.push(identity, difference);
        }
    }

    #[cfg(test)]
    pub fn get(&self, identity: &str) -> Option<&[Difference]> {
        self.0.get(identity).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Difference])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[cfg(test)]
    pub fn contains(&self, identity: &str) -> bool {
        self.0.contains_key(identity)
    }

    /// Number of entities with differences
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of differences across all entities
    pub fn difference_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Result of diffing one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDiff<T> {
    pub missing: Vec<T>,
    pub mismatched: DiffMap,
    pub additional: Vec<T>,
}

impl<T> Default for CategoryDiff<T> {
    fn default() -> Self {
        Self {
            missing: Vec::new(),
            mismatched: DiffMap::new(),
            additional: Vec::new(),
        }
    }
}

impl<T: Entity> CategoryDiff<T> {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty() && self.additional.is_empty()
    }

    /// Drop the entity payloads, keeping identities only
    pub fn into_report(self, category: Category) -> CategoryReport {
        CategoryReport {
            category,
            missing: self.missing.iter().map(|e| e.identity().to_string()).collect(),
            mismatched: self.mismatched,
            additional: self.additional.iter().map(|e| e.identity().to_string()).collect(),
        }
    }
}

/// Category result as consumed by the report renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub missing: Vec<String>,
    pub mismatched: DiffMap,
    pub additional: Vec<String>,
}

impl CategoryReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty() && self.additional.is_empty()
    }

    /// Rows this category produces in a report
    pub fn row_count(&self) -> usize {
        self.missing.len() + self.mismatched.difference_count() + self.additional.len()
    }
}

impl Entity for String {
    fn identity(&self) -> &str {
        self
    }
}

/// Diff two identity-sorted collections.
///
/// `compare` is called for every identity present on both sides whose
/// entities are not equal; identical collections short-circuit to an empty
/// result.
pub fn diff_entities<T, F>(base: &[T], test: &[T], mut compare: F) -> CategoryDiff<T>
where
    T: Entity + Clone + PartialEq,
    F: FnMut(&T, &T) -> Vec<Difference>,
{
    if base == test {
        return CategoryDiff::default();
    }

    let (missing, additional) = split_by_identity(base, test);
    let mut diff = CategoryDiff {
        missing: missing.into_iter().cloned().collect(),
        mismatched: DiffMap::new(),
        additional: additional.into_iter().cloned().collect(),
    };

    let test_index = index_by_identity(test);
    let mut seen = HashSet::new();
    for b in base {
        if !seen.insert(b.identity()) {
            continue;
        }
        if let Some(&t) = test_index.get(b.identity()) {
            if b != t {
                diff.mismatched.extend(b.identity(), compare(b, t));
            }
        }
    }

    diff
}

/// Entities whose identity is absent from the other side: (missing, additional)
pub fn split_by_identity<'a, T: Entity>(base: &'a [T], test: &'a [T]) -> (Vec<&'a T>, Vec<&'a T>) {
    let base_ids: HashSet<&str> = base.iter().map(Entity::identity).collect();
    let test_ids: HashSet<&str> = test.iter().map(Entity::identity).collect();

    let missing = base
        .iter()
        .filter(|b| !test_ids.contains(b.identity()))
        .collect();
    let additional = test
        .iter()
        .filter(|t| !base_ids.contains(t.identity()))
        .collect();

    (missing, additional)
}

/// First entity per identity
fn index_by_identity<T: Entity>(items: &[T]) -> HashMap<&str, &T> {
    let mut index = HashMap::new();
    for item in items {
        index.entry(item.identity()).or_insert(item);
    }
    index
}

/// `"<entity> has mismatch <property> property"`
pub fn mismatch_description(entity_label: &str, property: &str) -> String {
    format!("{} has mismatch {} property", entity_label, property)
}

/// One difference per property whose value differs. Properties present on
/// only one side compare against an empty value.
pub fn compare_properties(
    entity_label: &str,
    base: &PropertyMap,
    test: &PropertyMap,
) -> Vec<Difference> {
    let test_only = test.keys().filter(|k| !base.contains_key(k));

    base.keys()
        .chain(test_only)
        .filter_map(|key| {
            let b = base.get(key);
            let t = test.get(key);
            (b != t).then(|| {
                Difference::new(
                    mismatch_description(entity_label, key),
                    b.unwrap_or(""),
                    t.unwrap_or(""),
                )
            })
        })
        .collect()
}
