//! Normalized schema entities
//!
//! Every entity exposes an identity used to match it between the base and
//! test documents. Collections are always sorted by that identity.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Field type whose Length is always compared
pub const TEXT_FIELD_TYPE: &str = "esriFieldTypeString";

/// Anything that can be matched by identity across two documents
pub trait Entity {
    fn identity(&self) -> &str;
}

/// Ordered property name to value mapping
///
/// Order follows the property descriptor the values were extracted with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyMap(Vec<(String, String)>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Coded values keyed by description, so iteration is sorted by description
pub type CodedValues = BTreeMap<String, String>;

/// Attribute domain (coded value or range)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub name: String,
    pub properties: PropertyMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coded_values: Option<CodedValues>,
}

impl Entity for Domain {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Feature dataset and the feature classes it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDataset {
    pub name: String,
    pub properties: PropertyMap,
    pub feature_classes: Vec<String>,
}

impl Entity for FeatureDataset {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Feature class or table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub name: String,
    pub properties: PropertyMap,
    pub default_subtype_code: String,
    pub subtypes: Vec<Subtype>,
    pub fields: Vec<Field>,
}

impl Dataset {
    /// Subtype field name, empty when the dataset has no subtypes
    pub fn subtype_field(&self) -> &str {
        self.properties.get("SubtypeFieldName").unwrap_or("")
    }

    /// First field with the given (case-insensitive) name
    pub fn field(&self, name: &str) -> Option<&Field> {
        let key = name.to_lowercase();
        self.fields.iter().find(|f| f.key == key)
    }
}

impl Entity for Dataset {
    fn identity(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtype {
    pub name: String,
    pub code: String,
}

impl Entity for Subtype {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Lowercased name, the identity used for matching
    pub key: String,
    /// Name as written in the export
    pub name: String,
    pub properties: PropertyMap,
}

impl Field {
    pub fn field_type(&self) -> &str {
        self.properties.get("Type").unwrap_or("")
    }

    pub fn is_text(&self) -> bool {
        self.field_type() == TEXT_FIELD_TYPE
    }
}

impl Entity for Field {
    fn identity(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipClass {
    pub name: String,
    pub properties: PropertyMap,
    /// Sorted; compared by value
    pub rules: Vec<RelationshipRule>,
}

impl Entity for RelationshipClass {
    fn identity(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub name: String,
    pub properties: PropertyMap,
    pub feature_classes: Vec<String>,
    pub rules: Vec<TopologyRule>,
}

impl Entity for Topology {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Topology rule with class IDs already resolved to class names.
///
/// Field order drives the sort: origin class, rule type, destination class,
/// then subtypes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TopologyRule {
    pub origin_class: String,
    pub rule_type: String,
    pub destination_class: String,
    pub origin_subtype: String,
    pub destination_subtype: String,
}

impl fmt::Display for TopologyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{TopologyRuleType: {}, OriginClassID: {}, DestinationClassID: {}, OriginSubtype: {}, DestinationSubtype: {}}}",
            self.rule_type,
            self.origin_class,
            self.destination_class,
            self.origin_subtype,
            self.destination_subtype
        )
    }
}

/// Relationship rule with class IDs resolved to feature class or table
/// names. The export's `RuleID` is document-local and not kept.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationshipRule {
    pub origin_class: String,
    pub origin_subtype: String,
    pub origin_minimum_cardinality: String,
    pub origin_maximum_cardinality: String,
    pub destination_class: String,
    pub destination_subtype: String,
    pub destination_minimum_cardinality: String,
    pub destination_maximum_cardinality: String,
}

impl fmt::Display for RelationshipRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{OriginClassID: {}, OriginSubtype: {}, OriginCardinality: {}..{}, DestinationClassID: {}, DestinationSubtype: {}, DestinationCardinality: {}..{}}}",
            self.origin_class,
            self.origin_subtype,
            self.origin_minimum_cardinality,
            self.origin_maximum_cardinality,
            self.destination_class,
            self.destination_subtype,
            self.destination_minimum_cardinality,
            self.destination_maximum_cardinality
        )
    }
}

/// Attribute rule attached to a feature class or table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRule {
    /// `<dataset name>: <rule name>`
    pub key: String,
    pub dataset: String,
    pub name: String,
    pub properties: PropertyMap,
}

impl AttributeRule {
    pub fn new(dataset: &str, name: &str, properties: PropertyMap) -> Self {
        Self {
            key: format!("{}: {}", dataset, name),
            dataset: dataset.to_string(),
            name: name.to_string(),
            properties,
        }
    }
}

impl Entity for AttributeRule {
    fn identity(&self) -> &str {
        &self.key
    }
}
