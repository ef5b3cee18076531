mod config;
mod error;
pub mod parse;
#[cfg(feature = "cache")]
pub mod serial;
mod transform;
mod types;

pub use config::{StalePolicy, TransformerConfig};
pub use error::TransformError;
pub use parse::ParseError;
#[cfg(feature = "cache")]
pub use serial::{DeserializeError, SerializeError};
pub use transform::{current_level, transform_all, widen, AccessTransformer};
pub use types::{
    resolve_finality, AccessFlags, AccessLevel, AccessTransformationSet, AmbiguousOverloadError,
    ClassNode, ElementKind, ElementReference, FieldNode, Finality, MethodNode, StaleRuleError,
    TransformReport, Transformation, Visibility,
};
