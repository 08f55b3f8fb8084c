//! Attribute rule comparison, keyed by `<dataset>: <rule>`

use crate::schema::AttributeRule;

use super::{compare_properties, diff_entities, CategoryDiff};

pub fn diff_attribute_rules(
    base: &[AttributeRule],
    test: &[AttributeRule],
) -> CategoryDiff<AttributeRule> {
    // Labelled by the rule's own name on every iteration
    diff_entities(base, test, |b, t| compare_properties(&b.name, &b.properties, &t.properties))
}
