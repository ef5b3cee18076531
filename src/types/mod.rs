mod access_level;
mod class_node;
mod element;
mod error;
mod report;
mod ruleset;
mod transformation;

pub use access_level::{resolve_finality, AccessLevel, Finality, Visibility};
pub use class_node::{AccessFlags, ClassNode, FieldNode, MethodNode};
pub use element::{ElementKind, ElementReference};
pub use error::{AmbiguousOverloadError, StaleRuleError};
pub use report::TransformReport;
pub use ruleset::AccessTransformationSet;
pub use transformation::Transformation;
