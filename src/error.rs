use thiserror::Error;

use crate::parse::ParseError;
use crate::{AmbiguousOverloadError, StaleRuleError};

/// Unified error type covering rule loading, application and I/O.
///
/// Returned by convenience methods like
/// [`AccessTransformationSet::add_file()`](crate::AccessTransformationSet::add_file)
/// and [`AccessTransformer::finish()`](crate::AccessTransformer::finish).
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Stale(#[from] StaleRuleError),

    #[error(transparent)]
    Ambiguous(#[from] AmbiguousOverloadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
