//! Feature dataset, feature class and table comparison

use std::collections::HashSet;

use crate::schema::{Dataset, FeatureDataset};

use super::{
    compare_properties, diff_entities, mismatch_description, split_by_identity, Category,
    CategoryDiff, Difference,
};

/// Compare feature datasets: scalar properties plus feature class membership
pub fn diff_feature_datasets(
    base: &[FeatureDataset],
    test: &[FeatureDataset],
) -> CategoryDiff<FeatureDataset> {
    let label = Category::FeatureDatasets.entity_label();

    diff_entities(base, test, |b, t| {
        let mut entries = compare_properties(label, &b.properties, &t.properties);

        let (missing, additional) = split_by_identity(&b.feature_classes, &t.feature_classes);
        for fc in missing {
            entries.push(Difference::missing("Missing feature class in feature dataset", fc));
        }
        for fc in additional {
            entries.push(Difference::additional("Additional feature class in feature dataset", fc));
        }

        entries
    })
}

/// Compare feature classes or tables (`category` picks the label)
pub fn diff_datasets(base: &[Dataset], test: &[Dataset], category: Category) -> CategoryDiff<Dataset> {
    let label = category.entity_label();
    diff_entities(base, test, |b, t| compare_dataset(label, b, t))
}

fn compare_dataset(label: &str, base: &Dataset, test: &Dataset) -> Vec<Difference> {
    let mut entries = compare_properties(label, &base.properties, &test.properties);

    // A different subtype field is already reported above
    if base.subtype_field() == test.subtype_field()
        && base.default_subtype_code != test.default_subtype_code
    {
        entries.push(Difference::new(
            mismatch_description(label, "DefaultSubtypeCode"),
            &base.default_subtype_code,
            &test.default_subtype_code,
        ));
    }

    // Subtypes match by name only; code changes surface through DefaultSubtypeCode
    let (missing, additional) = split_by_identity(&base.subtypes, &test.subtypes);
    for st in missing {
        entries.push(Difference::missing("Missing subtype", &st.name));
    }
    for st in additional {
        entries.push(Difference::additional("Additional subtype", &st.name));
    }

    entries.extend(compare_fields(base, test));
    entries
}

/// Field list diff by lowercased name, then property by property for common fields
fn compare_fields(base: &Dataset, test: &Dataset) -> Vec<Difference> {
    let mut entries = Vec::new();

    let (missing, additional) = split_by_identity(&base.fields, &test.fields);
    for fld in missing {
        entries.push(Difference::missing("Missing field", &fld.name));
    }
    for fld in additional {
        entries.push(Difference::additional("Additional field", &fld.name));
    }

    let mut seen = HashSet::new();
    for b in &base.fields {
        if !seen.insert(b.key.as_str()) {
            continue;
        }
        let Some(t) = test.field(&b.key) else {
            continue;
        };

        // Only properties present on both records are compared
        for (key, base_value) in b.properties.iter() {
            if let Some(test_value) = t.properties.get(key) {
                if base_value != test_value {
                    entries.push(Difference::new(
                        format!("{} field has different values for {}", b.name, key),
                        base_value,
                        test_value,
                    ));
                }
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::models::{Field, Subtype};
    use crate::schema::PropertyMap;

    fn make_field(name: &str, props: &[(&str, &str)]) -> Field {
        Field {
            key: name.to_lowercase(),
            name: name.to_string(),
            properties: props.iter().copied().collect(),
        }
    }

    fn make_dataset(name: &str, fields: Vec<Field>) -> Dataset {
        Dataset {
            name: name.to_string(),
            properties: [("Versioned", "false"), ("SubtypeFieldName", "")]
                .into_iter()
                .collect(),
            default_subtype_code: String::new(),
            subtypes: vec![],
            fields,
        }
    }

    fn make_feature_dataset(name: &str, classes: &[&str]) -> FeatureDataset {
        FeatureDataset {
            name: name.to_string(),
            properties: PropertyMap::new(),
            feature_classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_field_domain_removed() {
        let base = vec![make_dataset(
            "Roads",
            vec![make_field("SPEED", &[("Type", "esriFieldTypeSmallInteger"), ("Domain", "SpeedLimits")])],
        )];
        let test = vec![make_dataset(
            "Roads",
            vec![make_field("SPEED", &[("Type", "esriFieldTypeSmallInteger"), ("Domain", "")])],
        )];

        let diff = diff_datasets(&base, &test, Category::FeatureClasses);
        assert_eq!(
            diff.mismatched.get("Roads").unwrap(),
            &[Difference::new("SPEED field has different values for Domain", "SpeedLimits", "")]
        );
    }

    #[test]
    fn test_field_case_is_ignored() {
        let base = vec![make_dataset("Roads", vec![make_field("OWNER", &[("Type", "esriFieldTypeString")])])];
        let test = vec![make_dataset("Roads", vec![make_field("owner", &[("Type", "esriFieldTypeString")])])];

        let diff = diff_datasets(&base, &test, Category::FeatureClasses);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_missing_and_additional_fields() {
        let base = vec![make_dataset("Owners", vec![make_field("NAME", &[]), make_field("OLD", &[])])];
        let test = vec![make_dataset("Owners", vec![make_field("NAME", &[]), make_field("NEW", &[])])];

        let diff = diff_datasets(&base, &test, Category::Tables);
        assert_eq!(
            diff.mismatched.get("Owners").unwrap(),
            &[
                Difference::new("Missing field", "OLD", ""),
                Difference::new("Additional field", "", "NEW"),
            ]
        );
    }

    #[test]
    fn test_property_only_on_one_field_record_is_skipped() {
        let base = vec![make_dataset("T", vec![make_field("COUNT", &[("Type", "esriFieldTypeInteger")])])];
        let test = vec![make_dataset(
            "T",
            vec![make_field("COUNT", &[("Type", "esriFieldTypeInteger"), ("Length", "4")])],
        )];

        let diff = diff_datasets(&base, &test, Category::Tables);
        assert!(diff.mismatched.is_empty());
    }

    #[test]
    fn test_dataset_property_mismatch_label() {
        let base = vec![make_dataset("Owners", vec![])];
        let mut changed = make_dataset("Owners", vec![]);
        changed.properties.insert("Versioned", "true");
        let test = vec![changed];

        let diff = diff_datasets(&base, &test, Category::Tables);
        assert_eq!(
            diff.mismatched.get("Owners").unwrap(),
            &[Difference::new("Table has mismatch Versioned property", "false", "true")]
        );
    }

    #[test]
    fn test_subtypes_and_default_code() {
        let mut base = make_dataset("Roads", vec![]);
        base.properties.insert("SubtypeFieldName", "ROADCLASS");
        base.default_subtype_code = "1".to_string();
        base.subtypes = vec![
            Subtype { name: "Highway".to_string(), code: "1".to_string() },
            Subtype { name: "Local".to_string(), code: "2".to_string() },
        ];

        let mut test = base.clone();
        test.default_subtype_code = "2".to_string();
        test.subtypes = vec![
            Subtype { name: "Highway".to_string(), code: "5".to_string() },
            Subtype { name: "Track".to_string(), code: "3".to_string() },
        ];

        let diff = diff_datasets(&[base], &[test], Category::FeatureClasses);
        assert_eq!(
            diff.mismatched.get("Roads").unwrap(),
            &[
                Difference::new("Feature Class has mismatch DefaultSubtypeCode property", "1", "2"),
                Difference::new("Missing subtype", "Local", ""),
                Difference::new("Additional subtype", "", "Track"),
            ]
        );
    }

    #[test]
    fn test_default_code_skipped_when_subtype_field_changes() {
        let mut base = make_dataset("Roads", vec![]);
        base.properties.insert("SubtypeFieldName", "ROADCLASS");
        base.default_subtype_code = "1".to_string();
        let mut test = base.clone();
        test.properties.insert("SubtypeFieldName", "KIND");
        test.default_subtype_code = "3".to_string();

        let diff = diff_datasets(&[base], &[test], Category::FeatureClasses);
        let entries = diff.mismatched.get("Roads").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Feature Class has mismatch SubtypeFieldName property");
    }

    #[test]
    fn test_additional_dataset_has_no_mismatch_entry() {
        let base = vec![make_dataset("Owners", vec![])];
        let test = vec![make_dataset("Inspections", vec![]), make_dataset("Owners", vec![])];

        let diff = diff_datasets(&base, &test, Category::Tables);
        assert_eq!(diff.additional.len(), 1);
        assert_eq!(diff.additional[0].name, "Inspections");
        assert!(diff.mismatched.is_empty());
        assert!(diff.missing.is_empty());
    }

    #[test]
    fn test_feature_dataset_membership() {
        let base = vec![make_feature_dataset("Transport", &["Parcels", "Roads"])];
        let test = vec![make_feature_dataset("Transport", &["Rail", "Roads"])];

        let diff = diff_feature_datasets(&base, &test);
        assert_eq!(
            diff.mismatched.get("Transport").unwrap(),
            &[
                Difference::new("Missing feature class in feature dataset", "Parcels", ""),
                Difference::new("Additional feature class in feature dataset", "", "Rail"),
            ]
        );
    }
}
