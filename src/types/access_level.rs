use std::fmt;
use std::str::FromStr;

use crate::parse::ParseError;

/// JVM visibility, ordered from most restrictive to most open.
///
/// The derived `Ord` is the widening order: `Private < Default < Protected < Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    Private,
    /// Package-private: none of the public/protected/private bits set.
    Default,
    Protected,
    Public,
}

/// What a rule asks of the `final` modifier.
///
/// The derived `Ord` is the dominance order used by [`resolve_finality`]:
/// `Unspecified < ForceFinal < ForceNonFinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Finality {
    #[default]
    Unspecified,
    ForceFinal,
    ForceNonFinal,
}

/// Resolve two finality requests into one.
///
/// An explicit request to drop `final` wins over a request to add it, which
/// wins over no request at all.
#[must_use]
pub fn resolve_finality(a: Finality, b: Finality) -> Finality {
    a.max(b)
}

/// Minimum visibility plus a finality request, as written in one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessLevel {
    visibility: Visibility,
    finality: Finality,
}

impl AccessLevel {
    #[must_use]
    pub const fn new(visibility: Visibility, finality: Finality) -> Self {
        Self {
            visibility,
            finality,
        }
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn finality(&self) -> Finality {
        self.finality
    }

    /// Least upper bound of two levels: the wider visibility and the dominant
    /// finality request.
    #[must_use]
    pub fn union(self, other: AccessLevel) -> AccessLevel {
        AccessLevel {
            visibility: self.visibility.max(other.visibility),
            finality: resolve_finality(self.finality, other.finality),
        }
    }

    /// Union with a possibly absent earlier request.
    #[must_use]
    pub fn union_with(existing: Option<AccessLevel>, other: AccessLevel) -> AccessLevel {
        match existing {
            Some(level) => level.union(other),
            None => other,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Default => write!(f, "default"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.visibility)?;
        match self.finality {
            Finality::Unspecified => Ok(()),
            Finality::ForceFinal => write!(f, "+f"),
            Finality::ForceNonFinal => write!(f, "-f"),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = ParseError;

    /// Parse a bare access token such as `public`, `protected-f` or `private+f`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_access_level(s)
    }
}
