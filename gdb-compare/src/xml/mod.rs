//! Generic document tree for XML workspace exports
//!
//! The XML is read once with `roxmltree` and copied into an owned tree of
//! [`Element`] nodes. All schema extraction works on this tree, so the parser
//! never depends on the XML library's borrowing model.

use std::collections::HashMap;
use std::path::Path;

use roxmltree::Document;

use crate::error::{Result, SchemaError};

/// Tag of the elements that describe datasets in a workspace export
pub const DATA_ELEMENT: &str = "DataElement";

/// Discriminator values carried by `DataElement` nodes
pub mod element_type {
    pub const FEATURE_DATASET: &str = "esri:DEFeatureDataset";
    pub const FEATURE_CLASS: &str = "esri:DEFeatureClass";
    pub const TABLE: &str = "esri:DETable";
    pub const RELATIONSHIP_CLASS: &str = "esri:DERelationshipClass";
    pub const TOPOLOGY: &str = "esri:DETopology";
}

/// One node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    /// Attributes keyed by local name (`xsi:type` is stored as `type`)
    pub attributes: Vec<(String, String)>,
    /// Text content, only kept for nodes without element children
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `xsi:type` discriminator
    pub fn element_type(&self) -> Option<&str> {
        self.attribute("type")
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Direct children with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Text of the first direct child with the given tag
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).map(Element::text_or_empty)
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Depth-first, pre-order walk over every node below this one
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// All nodes below this one with the given tag, in document order
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.tag == tag)
    }

    /// Texts of all leaf nodes below this one, in document order
    pub fn leaf_texts(&self) -> Vec<&str> {
        self.descendants()
            .filter(|e| e.is_leaf())
            .map(Element::text_or_empty)
            .collect()
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Element::new(node.tag_name().name());
        element.attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        let mut text = String::new();
        let mut has_text = false;
        for child in node.children() {
            if child.is_element() {
                element.children.push(Element::from_node(child));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    text.push_str(t);
                    has_text = true;
                }
            }
        }

        if element.children.is_empty() && has_text {
            element.text = Some(text);
        }
        element
    }
}

/// Iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// A parsed workspace schema export. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    root: Element,
}

impl SchemaDocument {
    /// Parse a document from XML text
    pub fn parse_str(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = Element::from_node(doc.root_element());
        log::debug!("Parsed schema document with root <{}>", root.tag);
        Ok(Self { root })
    }

    /// Read and parse a document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        log::info!("Loading schema document: {}", path.display());
        let xml = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&xml)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every `DataElement` in the document whose discriminator is `ds_type`,
    /// including those nested inside feature datasets
    pub fn data_elements<'a>(&'a self, ds_type: &'a str) -> Vec<&'a Element> {
        self.data_elements_of(&[ds_type])
    }

    /// Every `DataElement` whose discriminator is one of `ds_types`
    pub fn data_elements_of<'a>(&'a self, ds_types: &[&str]) -> Vec<&'a Element> {
        std::iter::once(&self.root)
            .chain(self.root.descendants())
            .filter(|e| e.tag == DATA_ELEMENT)
            .filter(|e| e.element_type().is_some_and(|t| ds_types.contains(&t)))
            .collect()
    }

    /// Lookup table from feature class and table `DSID` to name. IDs are
    /// local to one export and never compared directly.
    pub fn class_ids(&self) -> HashMap<String, String> {
        self.data_elements_of(&[element_type::FEATURE_CLASS, element_type::TABLE])
            .into_iter()
            .filter_map(|ds| {
                let id = ds.child_text("DSID")?;
                let name = ds.child_text("Name")?;
                Some((id.to_string(), name.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<esri:Workspace xmlns:esri="http://www.esri.com/schemas/ArcGIS/10.8" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <WorkspaceDefinition xsi:type="esri:WorkspaceDefinition">
    <DatasetDefinitions xsi:type="esri:ArrayOfDataElement">
      <DataElement xsi:type="esri:DEFeatureDataset">
        <Name>Transport</Name>
        <Children xsi:type="esri:ArrayOfDataElement">
          <DataElement xsi:type="esri:DEFeatureClass">
            <Name>Roads</Name>
            <DSID>7</DSID>
          </DataElement>
        </Children>
      </DataElement>
      <DataElement xsi:type="esri:DETable">
        <Name>Inspections</Name>
        <DSID>9</DSID>
      </DataElement>
    </DatasetDefinitions>
  </WorkspaceDefinition>
</esri:Workspace>"#;

    #[test]
    fn test_parse_builds_tree() {
        let doc = SchemaDocument::parse_str(SAMPLE).unwrap();
        assert_eq!(doc.root().tag, "Workspace");
        let definition = doc.root().child("WorkspaceDefinition").unwrap();
        assert_eq!(definition.element_type(), Some("esri:WorkspaceDefinition"));
    }

    #[test]
    fn test_nested_data_elements_are_found() {
        let doc = SchemaDocument::parse_str(SAMPLE).unwrap();
        let fcs = doc.data_elements(element_type::FEATURE_CLASS);
        assert_eq!(fcs.len(), 1);
        assert_eq!(fcs[0].child_text("Name"), Some("Roads"));

        let both = doc.data_elements_of(&[element_type::FEATURE_CLASS, element_type::TABLE]);
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_class_ids_cover_feature_classes_and_tables() {
        let doc = SchemaDocument::parse_str(SAMPLE).unwrap();
        let ids = doc.class_ids();
        assert_eq!(ids.get("7").map(String::as_str), Some("Roads"));
        assert_eq!(ids.get("9").map(String::as_str), Some("Inspections"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_container_text_is_dropped() {
        let doc = SchemaDocument::parse_str(SAMPLE).unwrap();
        let fds = &doc.data_elements(element_type::FEATURE_DATASET)[0];
        assert!(fds.text.is_none());
        assert_eq!(fds.child("Children").unwrap().leaf_texts(), vec!["Roads", "7"]);
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let result = SchemaDocument::parse_str("<Workspace><DataElement></Workspace>");
        assert!(matches!(result, Err(SchemaError::Malformed(_))));
    }
}
