use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::debug;

use super::access_level::AccessLevel;
use super::element::ElementReference;
use super::error::StaleRuleError;
use super::transformation::Transformation;
use crate::parse::ParseError;

/// All pending access changes, bucketed by class name.
///
/// Rules from any number of sources are merged with [`AccessLevel::union`], so
/// the merged state does not depend on the order sources were added in.
///
/// # Example
///
/// ```
/// use access_transformer::AccessTransformationSet;
///
/// let mut set = AccessTransformationSet::new();
/// set.add_rules("a.at", "protected net/example/Foo").unwrap();
/// set.add_rules("b.at", "public net/example/Foo\npublic net/example/Foo/bar ()V").unwrap();
///
/// let foo = set.get("net/example/Foo").unwrap();
/// assert_eq!(foo.access_change().unwrap().to_string(), "public");
/// assert!(foo.wants_method_change());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessTransformationSet {
    transformations: HashMap<String, Transformation>,
}

impl AccessTransformationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single rule source into a fresh set.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for the first malformed line.
    pub fn from_rules(source: &str, text: &str) -> Result<Self, ParseError> {
        let mut set = Self::new();
        set.add_rules(source, text)?;
        Ok(set)
    }

    /// Request at least `level` for `element`, merging with any earlier request.
    pub fn add_minimum_access_level(&mut self, element: ElementReference, level: AccessLevel) {
        self.transformations
            .entry(element.owner().to_owned())
            .or_insert_with_key(|name| Transformation::new(name.as_str()))
            .add(element, level);
    }

    /// Parse and add a single rule line. Blank and comment lines are accepted
    /// and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the line is malformed.
    pub fn add_rule_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.add_rules("<inline>", line).map(|_| ())
    }

    /// Parse every line of one rule source and add the rules.
    ///
    /// The whole source is parsed before anything is inserted, so a malformed
    /// line leaves the set untouched. Returns the number of rules added.
    ///
    /// Each line is `<access> <target>`, where the target is one of:
    ///
    /// ```text
    /// net/example/Foo                 class
    /// net/example/Foo.count           field, matched by name alone
    /// net/example/Foo/count I         field with descriptor
    /// net/example/Foo/run (I)V        method
    /// ```
    ///
    /// A bare `owner/name` is read as a class, never as a field.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] naming `source` and the offending line.
    pub fn add_rules(&mut self, source: &str, text: &str) -> Result<usize, ParseError> {
        let parsed = crate::parse::parse(source, text)?;
        let count = parsed.rules.len();
        for rule in parsed.rules {
            self.add_minimum_access_level(rule.element, rule.level);
        }
        debug!(source, rules = count, "loaded access transformer rules");
        Ok(count)
    }

    /// Read a rule file and add its rules. The path names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`](crate::TransformError) on I/O or parse failure.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<usize, crate::TransformError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(self.add_rules(&path.display().to_string(), &text)?)
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: AccessTransformationSet) {
        for (name, transformation) in other.transformations {
            match self.transformations.get_mut(&name) {
                Some(existing) => existing.merge(transformation),
                None => {
                    self.transformations.insert(name, transformation);
                }
            }
        }
    }

    /// Remove and return the bucket for `name`, if any rule targets that class.
    pub fn pop_transformations(&mut self, name: &str) -> Option<Transformation> {
        self.transformations.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Transformation> {
        self.transformations.get(name)
    }

    /// Number of classes with pending changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Names of classes with pending changes, sorted.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every pending target across all classes, sorted.
    #[must_use]
    pub fn pending(&self) -> Vec<ElementReference> {
        let mut out: Vec<ElementReference> = self
            .transformations
            .values()
            .flat_map(Transformation::remaining)
            .collect();
        out.sort();
        out
    }

    /// Every pending request, sorted by target. This is the canonical form of
    /// the set: two sets are equal exactly when their entries are equal.
    #[must_use]
    pub fn entries(&self) -> Vec<(ElementReference, AccessLevel)> {
        let mut out: Vec<(ElementReference, AccessLevel)> = self
            .transformations
            .values()
            .flat_map(Transformation::entries)
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Fail if any class bucket was never popped.
    ///
    /// # Errors
    ///
    /// Returns [`StaleRuleError`] naming every rule still pending.
    pub fn ensure_clear(&self) -> Result<(), StaleRuleError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(StaleRuleError::new(self.pending()))
        }
    }
}

#[cfg(feature = "cache")]
impl AccessTransformationSet {
    /// BLAKE3 digest of the merged rules in canonical order.
    ///
    /// Sets with equal [`entries()`](Self::entries) have equal fingerprints,
    /// regardless of how many sources they came from or in which order.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        crate::serial::fingerprint(self)
    }

    /// Serialize this set to a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self)
    }

    /// Deserialize a snapshot produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Write a snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(path: impl AsRef<Path>) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for AccessTransformationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: usize = self
            .transformations
            .values()
            .map(|t| t.remaining().len())
            .sum();
        write!(
            f,
            "AccessTransformationSet({} classes, {} rules)",
            self.transformations.len(),
            rules
        )
    }
}
