//! Domain comparison

use crate::schema::{CodedValues, Domain};

use super::{compare_properties, diff_entities, Category, CategoryDiff, Difference};

pub fn diff_domains(base: &[Domain], test: &[Domain]) -> CategoryDiff<Domain> {
    let label = Category::Domains.entity_label();

    diff_entities(base, test, |b, t| {
        let mut entries = compare_properties(label, &b.properties, &t.properties);
        if b.coded_values != t.coded_values {
            let empty = CodedValues::new();
            entries.extend(compare_coded_values(
                b.coded_values.as_ref().unwrap_or(&empty),
                t.coded_values.as_ref().unwrap_or(&empty),
            ));
        }
        entries
    })
}

/// Report coded value changes as a single difference carrying the
/// description/code pairs found only in base and only in test
fn compare_coded_values(base: &CodedValues, test: &CodedValues) -> Option<Difference> {
    let only_in = |a: &CodedValues, b: &CodedValues| -> CodedValues {
        a.iter()
            .filter(|(description, code)| b.get(*description) != Some(*code))
            .map(|(d, c)| (d.clone(), c.clone()))
            .collect()
    };

    let missing = only_in(base, test);
    let additional = only_in(test, base);

    let adjective = match (missing.is_empty(), additional.is_empty()) {
        (false, false) => "additional and missing",
        (false, true) => "missing",
        (true, false) => "additional",
        (true, true) => return None,
    };

    Some(Difference::new(
        format!("Domain has {} CodedValues", adjective),
        format_coded_values(&missing),
        format_coded_values(&additional),
    ))
}

/// `{<code>: '<description>', ...}` in description order, empty string when there are none
fn format_coded_values(values: &CodedValues) -> String {
    if values.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = values
        .iter()
        .map(|(description, code)| format!("{}: '{}'", code, description))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
