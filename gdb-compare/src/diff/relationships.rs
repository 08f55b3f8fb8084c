//! Relationship class comparison

use crate::schema::RelationshipClass;

use super::{compare_properties, diff_entities, Category, CategoryDiff, Difference};

/// Every differing property is appended, one difference each, followed by
/// each rule found on one side only
pub fn diff_relationship_classes(
    base: &[RelationshipClass],
    test: &[RelationshipClass],
) -> CategoryDiff<RelationshipClass> {
    let label = Category::RelationshipClasses.entity_label();

    diff_entities(base, test, |b, t| {
        let mut entries = compare_properties(label, &b.properties, &t.properties);

        for rule in b.rules.iter().filter(|r| !t.rules.contains(r)) {
            entries.push(Difference::missing("Missing relationship rule", rule.to_string()));
        }
        for rule in t.rules.iter().filter(|r| !b.rules.contains(r)) {
            entries.push(Difference::additional("Additional relationship rule", rule.to_string()));
        }

        entries
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::models::RelationshipRule;

    fn make_rule(origin_subtype: &str, destination_max: &str) -> RelationshipRule {
        RelationshipRule {
            origin_class: "Roads".to_string(),
            origin_subtype: origin_subtype.to_string(),
            origin_minimum_cardinality: "0".to_string(),
            origin_maximum_cardinality: "1".to_string(),
            destination_class: "Owners".to_string(),
            destination_subtype: "0".to_string(),
            destination_minimum_cardinality: "0".to_string(),
            destination_maximum_cardinality: destination_max.to_string(),
        }
    }

    fn make_rc(name: &str, cardinality: &str, composite: &str) -> RelationshipClass {
        RelationshipClass {
            name: name.to_string(),
            properties: [
                ("Cardinality", cardinality),
                ("IsComposite", composite),
                ("OriginClassNames", "Roads"),
            ]
            .into_iter()
            .collect(),
            rules: vec![make_rule("1", "5")],
        }
    }

    #[test]
    fn test_multiple_mismatches_all_reported() {
        let base = vec![make_rc("RoadsOwners", "esriRelCardinalityOneToMany", "false")];
        let test = vec![make_rc("RoadsOwners", "esriRelCardinalityManyToMany", "true")];

        let diff = diff_relationship_classes(&base, &test);
        assert_eq!(
            diff.mismatched.get("RoadsOwners").unwrap(),
            &[
                Difference::new(
                    "Relationship Class has mismatch Cardinality property",
                    "esriRelCardinalityOneToMany",
                    "esriRelCardinalityManyToMany"
                ),
                Difference::new("Relationship Class has mismatch IsComposite property", "false", "true"),
            ]
        );
    }

    #[test]
    fn test_identical_relationship_classes() {
        let rcs = vec![make_rc("A", "esriRelCardinalityOneToOne", "false")];
        assert!(diff_relationship_classes(&rcs, &rcs).is_empty());
    }

    #[test]
    fn test_changed_rule_is_missing_and_additional() {
        let base = vec![make_rc("RoadsOwners", "esriRelCardinalityOneToMany", "false")];
        let mut changed = base[0].clone();
        changed.rules = vec![make_rule("1", "10")];

        let diff = diff_relationship_classes(&base, &[changed]);
        let entries = diff.mismatched.get("RoadsOwners").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "Missing relationship rule");
        assert_eq!(entries[0].base, make_rule("1", "5").to_string());
        assert_eq!(entries[0].test, "");
        assert_eq!(entries[1].description, "Additional relationship rule");
        assert_eq!(entries[1].test, make_rule("1", "10").to_string());
    }
}
