//! Topology comparison
//!
//! Member feature classes and rules have no properties of their own to
//! compare, so each one missing or added is its own difference.

use crate::schema::Topology;

use super::{compare_properties, diff_entities, split_by_identity, Category, CategoryDiff, Difference};

pub fn diff_topologies(base: &[Topology], test: &[Topology]) -> CategoryDiff<Topology> {
    let label = Category::Topologies.entity_label();

    diff_entities(base, test, |b, t| {
        let mut entries = compare_properties(label, &b.properties, &t.properties);

        let (missing, additional) = split_by_identity(&b.feature_classes, &t.feature_classes);
        for fc in missing {
            entries.push(Difference::missing("Missing feature class in topology", fc));
        }
        for fc in additional {
            entries.push(Difference::additional("Additional feature class in topology", fc));
        }

        // A rule's identity is its whole tuple
        for rule in b.rules.iter().filter(|r| !t.rules.contains(r)) {
            entries.push(Difference::missing("Missing topology rule", rule.to_string()));
        }
        for rule in t.rules.iter().filter(|r| !b.rules.contains(r)) {
            entries.push(Difference::additional("Additional topology rule", rule.to_string()));
        }

        entries
    })
}
