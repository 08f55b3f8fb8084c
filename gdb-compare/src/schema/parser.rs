//! Turns a [`SchemaDocument`] into normalized, sorted entity collections
//!
//! One function per category. Each walks the document tree for the elements
//! of its category and keeps only the properties listed in its descriptor.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{CompareOptions, IgnoreOption};
use crate::error::{Result, SchemaError};
use crate::xml::{element_type, Element, SchemaDocument};

use super::descriptors::{
    extract_properties, ATTRIBUTE_RULE_PROPERTIES, DATASET_PROPERTIES, DOMAIN_PROPERTIES,
    FEATURE_DATASET_PROPERTIES, FIELD_PROPERTIES, RELATIONSHIP_CLASS_PROPERTIES,
    TOPOLOGY_PROPERTIES,
};
use super::models::{
    AttributeRule, CodedValues, Dataset, Domain, Entity, FeatureDataset, Field,
    RelationshipClass, RelationshipRule, Subtype, Topology, TopologyRule,
};

/// All normalized collections of one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceSchema {
    pub feature_datasets: Vec<FeatureDataset>,
    pub feature_classes: Vec<Dataset>,
    pub tables: Vec<Dataset>,
    pub relationship_classes: Vec<RelationshipClass>,
    pub domains: Vec<Domain>,
    pub topologies: Vec<Topology>,
    pub attribute_rules: Vec<AttributeRule>,
}

impl WorkspaceSchema {
    /// Parse every category. Domains and topologies stay empty when the
    /// matching ignore option is set.
    pub fn parse(doc: &SchemaDocument, options: &CompareOptions) -> Result<Self> {
        let schema = Self {
            feature_datasets: parse_feature_datasets(doc, options)?,
            feature_classes: parse_datasets(doc, element_type::FEATURE_CLASS, options)?,
            tables: parse_datasets(doc, element_type::TABLE, options)?,
            relationship_classes: parse_relationship_classes(doc, options)?,
            domains: if options.ignores(IgnoreOption::Domains) {
                Vec::new()
            } else {
                parse_domains(doc, options)?
            },
            topologies: if options.ignores(IgnoreOption::Topology) {
                Vec::new()
            } else {
                parse_topologies(doc, options)?
            },
            attribute_rules: parse_attribute_rules(doc, options)?,
        };

        log::debug!(
            "Normalized schema: {} feature datasets, {} feature classes, {} tables, {} relationship classes, {} domains, {} topologies, {} attribute rules",
            schema.feature_datasets.len(),
            schema.feature_classes.len(),
            schema.tables.len(),
            schema.relationship_classes.len(),
            schema.domains.len(),
            schema.topologies.len(),
            schema.attribute_rules.len(),
        );

        Ok(schema)
    }
}

fn required_name(element: &Element, category: &'static str) -> Result<String> {
    element
        .child_text("Name")
        .map(str::to_string)
        .ok_or(SchemaError::MissingElement {
            category,
            tag: "Name",
        })
}

fn sort_by_identity<T: Entity>(items: &mut [T]) {
    items.sort_by(|a, b| a.identity().cmp(b.identity()));
}

/// Parse every domain under the workspace `Domains` lists
pub fn parse_domains(doc: &SchemaDocument, options: &CompareOptions) -> Result<Vec<Domain>> {
    let root = doc.root();
    let mut domains = Vec::new();

    for list in std::iter::once(root).chain(root.descendants()).filter(|e| e.tag == "Domains") {
        for elem in list.children_named("Domain") {
            domains.push(parse_domain(elem, options)?);
        }
    }

    sort_by_identity(&mut domains);
    Ok(domains)
}

fn parse_domain(elem: &Element, options: &CompareOptions) -> Result<Domain> {
    let name = elem
        .child_text("DomainName")
        .ok_or(SchemaError::MissingElement {
            category: "Domain",
            tag: "DomainName",
        })?
        .to_string();

    let mut properties = extract_properties(elem, DOMAIN_PROPERTIES, options);

    let coded_values = elem.child("CodedValues").map(|list| {
        // Exports nest each code under its description, so key by description
        let mut values = CodedValues::new();
        for cv in &list.children {
            if let (Some(description), Some(code)) = (cv.child_text("Name"), cv.child_text("Code")) {
                values.insert(description.to_string(), code.to_string());
            }
        }
        values
    });

    let min = elem.child_text("MinValue");
    let max = elem.child_text("MaxValue");
    if min.is_some() || max.is_some() {
        properties.insert(
            "Range",
            format!("{} - {}", min.unwrap_or(""), max.unwrap_or("")),
        );
    }

    Ok(Domain {
        name,
        properties,
        coded_values,
    })
}

/// Parse feature datasets together with the names of their feature classes
pub fn parse_feature_datasets(
    doc: &SchemaDocument,
    options: &CompareOptions,
) -> Result<Vec<FeatureDataset>> {
    let mut datasets = Vec::new();

    for elem in doc.data_elements(element_type::FEATURE_DATASET) {
        let name = required_name(elem, "Feature Dataset")?;
        let properties = extract_properties(elem, FEATURE_DATASET_PROPERTIES, options);

        let mut feature_classes: Vec<String> = elem
            .child("Children")
            .map(|children| {
                children
                    .children_named("DataElement")
                    .filter(|c| c.element_type() == Some(element_type::FEATURE_CLASS))
                    .filter_map(|c| c.child_text("Name"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        feature_classes.sort();

        datasets.push(FeatureDataset {
            name,
            properties,
            feature_classes,
        });
    }

    sort_by_identity(&mut datasets);
    Ok(datasets)
}

/// Parse feature classes (`esri:DEFeatureClass`) or tables (`esri:DETable`)
pub fn parse_datasets(
    doc: &SchemaDocument,
    ds_type: &str,
    options: &CompareOptions,
) -> Result<Vec<Dataset>> {
    let category = if ds_type == element_type::TABLE {
        "Table"
    } else {
        "Feature Class"
    };

    let mut datasets = Vec::new();
    for elem in doc.data_elements(ds_type) {
        datasets.push(parse_dataset(elem, category, options)?);
    }

    sort_by_identity(&mut datasets);
    Ok(datasets)
}

fn parse_dataset(elem: &Element, category: &'static str, options: &CompareOptions) -> Result<Dataset> {
    let name = required_name(elem, category)?;
    let properties = extract_properties(elem, DATASET_PROPERTIES, options);
    let default_subtype_code = elem.child_text("DefaultSubtypeCode").unwrap_or("").to_string();

    let subtypes = elem
        .find_all("Subtype")
        .map(|st| Subtype {
            name: st.child_text("SubtypeName").unwrap_or("").to_string(),
            code: st.child_text("SubtypeCode").unwrap_or("").to_string(),
        })
        .collect();

    // Index definitions repeat full field definitions, so identical records are dropped
    let mut fields: Vec<Field> = Vec::new();
    for fld in elem.find_all("Field") {
        let field = parse_field(fld, options)?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }

    Ok(Dataset {
        name,
        properties,
        default_subtype_code,
        subtypes,
        fields,
    })
}

fn parse_field(elem: &Element, options: &CompareOptions) -> Result<Field> {
    let name = required_name(elem, "Field")?;
    let mut field = Field {
        key: name.to_lowercase(),
        name,
        properties: extract_properties(elem, FIELD_PROPERTIES, options),
    };

    if options.ignore_non_text_field_length && !field.is_text() {
        field.properties.remove("Length");
    }

    Ok(field)
}

pub fn parse_relationship_classes(
    doc: &SchemaDocument,
    options: &CompareOptions,
) -> Result<Vec<RelationshipClass>> {
    let class_ids = doc.class_ids();
    let mut classes = Vec::new();

    for elem in doc.data_elements(element_type::RELATIONSHIP_CLASS) {
        let name = required_name(elem, "Relationship Class")?;
        let properties = extract_properties(elem, RELATIONSHIP_CLASS_PROPERTIES, options);

        let mut rules = Vec::new();
        if let Some(list) = elem.child("RelationshipRules") {
            for rule in list.children_named("RelationshipRule") {
                rules.push(parse_relationship_rule(rule, &name, &class_ids)?);
            }
        }
        rules.sort();

        classes.push(RelationshipClass {
            name,
            properties,
            rules,
        });
    }

    sort_by_identity(&mut classes);
    Ok(classes)
}

fn parse_relationship_rule(
    rule: &Element,
    owner: &str,
    class_ids: &HashMap<String, String>,
) -> Result<RelationshipRule> {
    let text = |tag: &str| rule.child_text(tag).unwrap_or("").to_string();

    Ok(RelationshipRule {
        origin_class: resolve_class_id(rule, "OriginClassID", owner, class_ids)?,
        origin_subtype: text("OriginSubtype"),
        origin_minimum_cardinality: text("OriginMinimumCardinality"),
        origin_maximum_cardinality: text("OriginMaximumCardinality"),
        destination_class: resolve_class_id(rule, "DestinationClassID", owner, class_ids)?,
        destination_subtype: text("DestinationSubtype"),
        destination_minimum_cardinality: text("DestinationMinimumCardinality"),
        destination_maximum_cardinality: text("DestinationMaximumCardinality"),
    })
}

/// Class name for the ID stored in `tag`; empty when the tag is absent
fn resolve_class_id(
    rule: &Element,
    tag: &str,
    owner: &str,
    class_ids: &HashMap<String, String>,
) -> Result<String> {
    match rule.child_text(tag) {
        None => Ok(String::new()),
        Some(id) => class_ids
            .get(id)
            .cloned()
            .ok_or_else(|| SchemaError::UnresolvedClassId {
                owner: owner.to_string(),
                id: id.to_string(),
            }),
    }
}

/// Parse topologies, resolving rule class IDs to class names through this
/// document's own ID table
pub fn parse_topologies(doc: &SchemaDocument, options: &CompareOptions) -> Result<Vec<Topology>> {
    let class_ids = doc.class_ids();
    let mut topologies = Vec::new();

    for elem in doc.data_elements(element_type::TOPOLOGY) {
        let name = required_name(elem, "Topology")?;
        let properties = extract_properties(elem, TOPOLOGY_PROPERTIES, options);

        let mut feature_classes: Vec<String> = elem
            .child("FeatureClassNames")
            .map(|names| {
                names
                    .find_all("Name")
                    .map(|n| n.text_or_empty().to_string())
                    .collect()
            })
            .unwrap_or_default();
        feature_classes.sort();

        let mut rules = Vec::new();
        if let Some(list) = elem.child("TopologyRules") {
            for rule in &list.children {
                rules.push(parse_topology_rule(rule, &name, &class_ids)?);
            }
        }
        rules.sort();

        topologies.push(Topology {
            name,
            properties,
            feature_classes,
            rules,
        });
    }

    sort_by_identity(&mut topologies);
    Ok(topologies)
}

fn parse_topology_rule(
    rule: &Element,
    topology: &str,
    class_ids: &HashMap<String, String>,
) -> Result<TopologyRule> {
    Ok(TopologyRule {
        origin_class: resolve_class_id(rule, "OriginClassID", topology, class_ids)?,
        rule_type: rule.child_text("TopologyRuleType").unwrap_or("").to_string(),
        destination_class: resolve_class_id(rule, "DestinationClassID", topology, class_ids)?,
        origin_subtype: rule.child_text("OriginSubtype").unwrap_or("").to_string(),
        destination_subtype: rule.child_text("DestinationSubtype").unwrap_or("").to_string(),
    })
}

/// Parse attribute rules from both feature classes and tables
pub fn parse_attribute_rules(
    doc: &SchemaDocument,
    options: &CompareOptions,
) -> Result<Vec<AttributeRule>> {
    let mut rules = Vec::new();

    for elem in doc.data_elements_of(&[element_type::FEATURE_CLASS, element_type::TABLE]) {
        let Some(list) = elem.child("AttributeRules") else {
            continue;
        };
        let dataset = required_name(elem, "Dataset")?;

        for rule in list.children_named("AttributeRule") {
            let name = required_name(rule, "Attribute Rule")?;
            let properties = extract_properties(rule, ATTRIBUTE_RULE_PROPERTIES, options);
            rules.push(AttributeRule::new(&dataset, &name, properties));
        }
    }

    sort_by_identity(&mut rules);
    Ok(rules)
}
