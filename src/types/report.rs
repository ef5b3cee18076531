use std::fmt;

use super::element::ElementReference;

/// Summary returned by [`AccessTransformer::finish()`](crate::AccessTransformer::finish).
///
/// `unmatched` is only non-empty under [`StalePolicy::Warn`](crate::StalePolicy::Warn);
/// the other policies turn unmatched rules into an error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct TransformReport {
    classes_visited: usize,
    classes_changed: usize,
    members_changed: usize,
    unmatched: Vec<ElementReference>,
}

impl TransformReport {
    pub(crate) fn new(
        classes_visited: usize,
        classes_changed: usize,
        members_changed: usize,
        mut unmatched: Vec<ElementReference>,
    ) -> Self {
        unmatched.sort();
        unmatched.dedup();
        Self {
            classes_visited,
            classes_changed,
            members_changed,
            unmatched,
        }
    }

    /// Classes that had at least one rule targeting them.
    #[must_use]
    pub fn classes_visited(&self) -> usize {
        self.classes_visited
    }

    /// Classes whose own modifiers or any member's modifiers changed.
    #[must_use]
    pub fn classes_changed(&self) -> usize {
        self.classes_changed
    }

    /// Fields and methods whose modifiers changed.
    #[must_use]
    pub fn members_changed(&self) -> usize {
        self.members_changed
    }

    /// Rules that matched nothing, sorted.
    #[must_use]
    pub fn unmatched(&self) -> &[ElementReference] {
        &self.unmatched
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited: {}, changed: {} classes / {} members, unmatched: {}",
            self.classes_visited,
            self.classes_changed,
            self.members_changed,
            self.unmatched.len()
        )?;
        if !self.unmatched.is_empty() {
            let names: Vec<String> = self.unmatched.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", names.join(", "))?;
        }
        Ok(())
    }
}
