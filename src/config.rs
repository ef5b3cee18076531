/// What to do with rules that match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StalePolicy {
    /// Process every class, then fail from `finish()` listing every unmatched rule.
    #[default]
    FailAtEnd,
    /// Fail from `transform_class()` on the first class with unmatched member rules.
    FailFast,
    /// Log each unmatched rule and return them in the report.
    Warn,
}

/// Settings for an [`AccessTransformer`](crate::AccessTransformer).
///
/// # Example
///
/// ```
/// use access_transformer::{StalePolicy, TransformerConfig};
///
/// let config = TransformerConfig::new().stale_policy(StalePolicy::Warn);
/// assert_eq!(config.policy(), StalePolicy::Warn);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformerConfig {
    stale_policy: StalePolicy,
}

impl TransformerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> StalePolicy {
        self.stale_policy
    }
}
