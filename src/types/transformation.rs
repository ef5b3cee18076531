use std::collections::HashMap;

use super::access_level::AccessLevel;
use super::element::ElementReference;
use super::error::StaleRuleError;

/// Pending changes for a single class: an optional class-level request plus
/// per-member requests for its fields and methods.
///
/// Entries are popped as the matching members are visited. Anything left
/// afterwards names a member the class does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    name: String,
    access: Option<AccessLevel>,
    methods: HashMap<ElementReference, AccessLevel>,
    fields: HashMap<ElementReference, AccessLevel>,
}

impl Transformation {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: None,
            methods: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Internal name of the class these changes apply to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn access_change(&self) -> Option<AccessLevel> {
        self.access
    }

    #[must_use]
    pub fn wants_method_change(&self) -> bool {
        !self.methods.is_empty()
    }

    #[must_use]
    pub fn wants_field_change(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Merge one request into this bucket. The element must belong to this class.
    pub(crate) fn add(&mut self, element: ElementReference, level: AccessLevel) {
        debug_assert_eq!(element.owner(), self.name);
        match element {
            ElementReference::Class { .. } => {
                self.access = Some(AccessLevel::union_with(self.access, level));
            }
            ElementReference::Field { .. } => {
                let merged = AccessLevel::union_with(self.fields.get(&element).copied(), level);
                self.fields.insert(element, merged);
            }
            ElementReference::Method { .. } => {
                let merged = AccessLevel::union_with(self.methods.get(&element).copied(), level);
                self.methods.insert(element, merged);
            }
        }
    }

    pub(crate) fn merge(&mut self, other: Transformation) {
        if let Some(level) = other.access {
            self.access = Some(AccessLevel::union_with(self.access, level));
        }
        for (element, level) in other.fields.into_iter().chain(other.methods) {
            self.add(element, level);
        }
    }

    pub(crate) fn take_access_change(&mut self) -> Option<AccessLevel> {
        self.access.take()
    }

    pub(crate) fn pop_method(&mut self, name: &str, descriptor: &str) -> Option<AccessLevel> {
        self.methods
            .remove(&ElementReference::method(self.name.as_str(), name, descriptor))
    }

    /// Pop a field request. `None` as descriptor pops the name-only rule.
    pub(crate) fn pop_field(&mut self, name: &str, descriptor: Option<&str>) -> Option<AccessLevel> {
        self.fields
            .remove(&ElementReference::field(self.name.as_str(), name, descriptor))
    }

    /// Names of fields requested without a descriptor.
    pub(crate) fn name_only_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().filter_map(|element| match element {
            ElementReference::Field {
                name,
                descriptor: None,
                ..
            } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Every request still pending, sorted.
    #[must_use]
    pub fn remaining(&self) -> Vec<ElementReference> {
        let mut out: Vec<ElementReference> = self
            .access
            .map(|_| ElementReference::class(self.name.as_str()))
            .into_iter()
            .chain(self.fields.keys().cloned())
            .chain(self.methods.keys().cloned())
            .collect();
        out.sort();
        out
    }

    /// Every request as `(element, level)`, sorted by element.
    pub(crate) fn entries(&self) -> Vec<(ElementReference, AccessLevel)> {
        let mut out: Vec<(ElementReference, AccessLevel)> = self
            .access
            .map(|level| (ElementReference::class(self.name.as_str()), level))
            .into_iter()
            .chain(self.fields.iter().map(|(e, l)| (e.clone(), *l)))
            .chain(self.methods.iter().map(|(e, l)| (e.clone(), *l)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.methods.is_empty() && self.fields.is_empty()
    }

    /// Fail if any field or method request was not consumed.
    ///
    /// # Errors
    ///
    /// Returns [`StaleRuleError`] naming every unmatched member.
    pub fn ensure_clear(&self) -> Result<(), StaleRuleError> {
        if self.is_clear() {
            return Ok(());
        }
        let members = self
            .fields
            .keys()
            .chain(self.methods.keys())
            .cloned()
            .collect();
        Err(StaleRuleError::new(members))
    }
}
