//! Per-category property descriptors
//!
//! Each table lists the child tags of an element that take part in the
//! comparison and how to turn them into a string value. Tags not listed are
//! ignored, so new properties in future exports do not break parsing.

use crate::config::{CompareOptions, IgnoreOption};
use crate::xml::Element;

use super::models::PropertyMap;

/// How a property value is read from its element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The element's own text
    Text,
    /// Text of the named child element
    ChildText(&'static str),
    /// All leaf texts below the element joined with `", "`
    Leaves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub tag: &'static str,
    pub extract: Extract,
    /// Ignore option that removes this property from the comparison
    pub ignored_by: Option<IgnoreOption>,
    /// Value used when the element is absent; absent properties are skipped otherwise
    pub default: Option<&'static str>,
}

impl PropertySpec {
    pub const fn text(tag: &'static str) -> Self {
        Self {
            tag,
            extract: Extract::Text,
            ignored_by: None,
            default: None,
        }
    }

    pub const fn child_text(tag: &'static str, child: &'static str) -> Self {
        Self {
            tag,
            extract: Extract::ChildText(child),
            ignored_by: None,
            default: None,
        }
    }

    pub const fn leaves(tag: &'static str) -> Self {
        Self {
            tag,
            extract: Extract::Leaves,
            ignored_by: None,
            default: None,
        }
    }

    pub const fn ignored_by(mut self, option: IgnoreOption) -> Self {
        self.ignored_by = Some(option);
        self
    }

    pub const fn or_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    fn read(&self, element: &Element) -> String {
        match self.extract {
            Extract::Text => element.text_or_empty().to_string(),
            Extract::ChildText(child) => element.child_text(child).unwrap_or("").to_string(),
            Extract::Leaves => element.leaf_texts().join(", "),
        }
    }
}

pub const FEATURE_DATASET_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("Versioned"),
    PropertySpec::text("CanVersion"),
    PropertySpec::text("ConfigurationKeyword"),
    PropertySpec::child_text("SpatialReference", "WKID"),
];

pub const DATASET_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("Versioned"),
    PropertySpec::text("CanVersion"),
    PropertySpec::text("ConfigurationKeyword"),
    PropertySpec::text("AliasName").ignored_by(IgnoreOption::DatasetAlias),
    PropertySpec::text("ShapeType"),
    PropertySpec::text("HasM").ignored_by(IgnoreOption::HasM),
    PropertySpec::text("HasZ").ignored_by(IgnoreOption::HasZ),
    PropertySpec::text("SubtypeFieldName").or_default(""),
];

pub const FIELD_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("Type"),
    PropertySpec::text("IsNullable"),
    PropertySpec::text("Length"),
    PropertySpec::text("Precision"),
    PropertySpec::text("Scale"),
    PropertySpec::text("Required"),
    PropertySpec::text("Editable"),
    PropertySpec::text("DefaultValue"),
    PropertySpec::text("AliasName").ignored_by(IgnoreOption::FieldAlias),
    PropertySpec::child_text("Domain", "DomainName").or_default(""),
];

pub const DOMAIN_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("FieldType"),
    PropertySpec::text("MergePolicy"),
    PropertySpec::text("SplitPolicy"),
];

pub const RELATIONSHIP_CLASS_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("Versioned"),
    PropertySpec::text("CanVersion"),
    PropertySpec::text("ConfigurationKeyword"),
    PropertySpec::text("HasOID"),
    PropertySpec::text("OIDFieldName"),
    PropertySpec::text("Cardinality"),
    PropertySpec::text("IsComposite"),
    PropertySpec::leaves("OriginClassNames"),
    PropertySpec::leaves("DestinationClassNames"),
    PropertySpec::text("KeyType"),
    PropertySpec::text("ClassKey"),
    PropertySpec::text("IsReflexive"),
    PropertySpec::leaves("OriginClassKeys"),
    PropertySpec::text("IsAttachmentRelationship"),
];

pub const TOPOLOGY_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("ClusterTolerance"),
    PropertySpec::text("ZClusterTolerance"),
    PropertySpec::text("MaxGeneratedErrorCount"),
];

pub const ATTRIBUTE_RULE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::text("Type"),
    PropertySpec::text("FieldName"),
    PropertySpec::text("SubtypeCode"),
    PropertySpec::text("Description"),
    PropertySpec::text("UserEditable"),
    PropertySpec::text("IsEnabled"),
    PropertySpec::text("ReferencesExternalService"),
    PropertySpec::text("ExcludeFromClientEvaluation"),
    PropertySpec::text("ScriptExpression"),
    PropertySpec::leaves("TriggeringEvents"),
];

/// Extract the listed properties from the direct children of `element`
pub fn extract_properties(
    element: &Element,
    specs: &[PropertySpec],
    options: &CompareOptions,
) -> PropertyMap {
    let mut properties = PropertyMap::new();

    for spec in specs {
        if spec.ignored_by.is_some_and(|option| options.ignores(option)) {
            continue;
        }

        match element.child(spec.tag) {
            Some(child) => properties.insert(spec.tag, spec.read(child)),
            None => {
                if let Some(default) = spec.default {
                    properties.insert(spec.tag, default);
                }
            }
        }
    }

    properties
}
