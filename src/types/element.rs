use std::fmt;

/// Discriminant of an [`ElementReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Field,
    Method,
}

/// Identity of a class, field or method named by a rule.
///
/// Owners are JVM internal names (`net/example/Foo`). Equality is structural,
/// so a reference doubles as the lookup key for pending changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementReference {
    Class {
        name: String,
    },
    /// A field; `descriptor` is `None` when the rule matches the field by name alone.
    ///
    /// In rule text a descriptor-less field is written `owner.name`. A bare
    /// `owner/name` always names a class.
    Field {
        owner: String,
        name: String,
        descriptor: Option<String>,
    },
    Method {
        owner: String,
        name: String,
        descriptor: String,
    },
}

impl ElementReference {
    pub fn class(name: impl Into<String>) -> Self {
        ElementReference::Class { name: name.into() }
    }

    pub fn field(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: Option<&str>,
    ) -> Self {
        ElementReference::Field {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.map(str::to_owned),
        }
    }

    pub fn method(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        ElementReference::Method {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementReference::Class { .. } => ElementKind::Class,
            ElementReference::Field { .. } => ElementKind::Field,
            ElementReference::Method { .. } => ElementKind::Method,
        }
    }

    /// The class this reference belongs to. For a class reference, its own name.
    #[must_use]
    pub fn owner(&self) -> &str {
        match self {
            ElementReference::Class { name } => name,
            ElementReference::Field { owner, .. } | ElementReference::Method { owner, .. } => {
                owner
            }
        }
    }
}

impl fmt::Display for ElementReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementReference::Class { name } => write!(f, "{name}"),
            ElementReference::Field {
                owner,
                name,
                descriptor: None,
            } => write!(f, "{owner}.{name}"),
            ElementReference::Field {
                owner,
                name,
                descriptor: Some(desc),
            } => write!(f, "{owner}/{name} {desc}"),
            ElementReference::Method {
                owner,
                name,
                descriptor,
            } => write!(f, "{owner}/{name} {descriptor}"),
        }
    }
}
