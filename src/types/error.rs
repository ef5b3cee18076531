use thiserror::Error;

use super::element::ElementReference;

/// Rules whose target never turned up in the processed classes.
///
/// Each entry is either a member the class does not declare or a class that
/// never appeared in the input at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "stale access transformer rules ({} unmatched): {}",
    unmatched.len(),
    join(unmatched)
)]
pub struct StaleRuleError {
    unmatched: Vec<ElementReference>,
}

impl StaleRuleError {
    /// Build from an unordered list of targets. The list is sorted and deduplicated.
    pub(crate) fn new(mut unmatched: Vec<ElementReference>) -> Self {
        unmatched.sort();
        unmatched.dedup();
        Self { unmatched }
    }

    #[must_use]
    pub fn unmatched(&self) -> &[ElementReference] {
        &self.unmatched
    }
}

/// A descriptor-less field rule matched more than one field of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "ambiguous field rule '{class}.{name}': matches descriptors [{}]; add a descriptor",
    candidates.join(", ")
)]
pub struct AmbiguousOverloadError {
    pub class: String,
    pub name: String,
    pub candidates: Vec<String>,
}

fn join(refs: &[ElementReference]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
