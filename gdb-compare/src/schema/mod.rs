//! Normalized workspace schema entities and the parser that builds them

pub mod descriptors;
pub mod models;
pub mod parser;

pub use models::{
    AttributeRule, CodedValues, Dataset, Domain, Entity, FeatureDataset, PropertyMap,
    RelationshipClass, Topology,
};
pub use parser::WorkspaceSchema;
