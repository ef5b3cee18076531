use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::{
    AccessFlags, AccessLevel, AccessTransformationSet, AmbiguousOverloadError, ClassNode,
    ElementReference, Finality, StalePolicy, StaleRuleError, TransformError, TransformReport,
    Transformation, TransformerConfig, Visibility,
};

/// The visibility and finality a set of flags already has.
///
/// A `final` bit counts as an explicit [`Finality::ForceFinal`]; its absence
/// expresses no request, so a `+f` rule can still add it.
#[must_use]
pub fn current_level(access: AccessFlags) -> AccessLevel {
    let visibility = if access.contains(AccessFlags::PUBLIC) {
        Visibility::Public
    } else if access.contains(AccessFlags::PROTECTED) {
        Visibility::Protected
    } else if access.contains(AccessFlags::PRIVATE) {
        Visibility::Private
    } else {
        Visibility::Default
    };
    let finality = if access.contains(AccessFlags::FINAL) {
        Finality::ForceFinal
    } else {
        Finality::Unspecified
    };
    AccessLevel::new(visibility, finality)
}

/// Compute the flags that satisfy `requested` without narrowing `access`.
///
/// The requested level is unioned with the current one, so visibility only
/// ever widens. `final` is cleared only on an explicit `-f`. All other bits
/// pass through unchanged.
#[must_use]
pub fn widen(access: AccessFlags, requested: AccessLevel) -> AccessFlags {
    let merged = requested.union(current_level(access));

    let mut out = access.difference(AccessFlags::VISIBILITY);
    match merged.visibility() {
        Visibility::Public => out.insert(AccessFlags::PUBLIC),
        Visibility::Protected => out.insert(AccessFlags::PROTECTED),
        Visibility::Private => out.insert(AccessFlags::PRIVATE),
        Visibility::Default => {}
    }
    match merged.finality() {
        Finality::ForceNonFinal => out.remove(AccessFlags::FINAL),
        Finality::ForceFinal => out.insert(AccessFlags::FINAL),
        Finality::Unspecified => {}
    }
    out
}

fn rewrite(access: &mut AccessFlags, requested: AccessLevel) -> bool {
    let updated = widen(*access, requested);
    let changed = updated != *access;
    *access = updated;
    changed
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies an [`AccessTransformationSet`] to classes one at a time.
///
/// The transformer owns the merged rules, so every source has been merged
/// before the first class is rewritten. It is `Sync`: classes may be
/// transformed from several threads through a shared reference. Only popping a
/// class bucket takes the lock; the rewrite itself runs outside it.
///
/// # Example
///
/// ```
/// use access_transformer::{AccessFlags, AccessTransformationSet, AccessTransformer, ClassNode};
///
/// let rules = AccessTransformationSet::from_rules("mod.at", "public net/example/Foo").unwrap();
/// let transformer = AccessTransformer::new(rules);
///
/// let mut class = ClassNode::new("net/example/Foo", AccessFlags::SUPER);
/// assert!(transformer.transform_class(&mut class).unwrap());
/// assert!(class.access.contains(AccessFlags::PUBLIC));
///
/// let report = transformer.finish().unwrap();
/// assert!(report.is_clean());
/// ```
#[derive(Debug)]
pub struct AccessTransformer {
    rules: Mutex<AccessTransformationSet>,
    config: TransformerConfig,
    stale: Mutex<Vec<ElementReference>>,
    classes_visited: AtomicUsize,
    classes_changed: AtomicUsize,
    members_changed: AtomicUsize,
}

impl AccessTransformer {
    #[must_use]
    pub fn new(rules: AccessTransformationSet) -> Self {
        Self::with_config(rules, TransformerConfig::default())
    }

    #[must_use]
    pub fn with_config(rules: AccessTransformationSet, config: TransformerConfig) -> Self {
        Self {
            rules: Mutex::new(rules),
            config,
            stale: Mutex::new(Vec::new()),
            classes_visited: AtomicUsize::new(0),
            classes_changed: AtomicUsize::new(0),
            members_changed: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> TransformerConfig {
        self.config
    }

    /// Apply any pending rules for this class, in place.
    ///
    /// Returns whether any modifier changed. A class no rule targets is left
    /// alone. Each class bucket is consumed on first visit; transforming the
    /// same class name again is a no-op.
    ///
    /// # Errors
    ///
    /// - [`TransformError::Ambiguous`] if a descriptor-less field rule matches
    ///   more than one field. The class is left unmodified and all of its
    ///   rules stay pending, so [`finish`](Self::finish) still reports them.
    /// - [`TransformError::Stale`] under [`StalePolicy::FailFast`] if member
    ///   rules for this class matched nothing.
    pub fn transform_class(&self, class: &mut ClassNode) -> Result<bool, TransformError> {
        let popped = {
            let mut rules = lock(&self.rules);
            match rules.get(&class.name) {
                None => None,
                Some(pending) => {
                    check_ambiguity(pending, class)?;
                    rules.pop_transformations(&class.name)
                }
            }
        };
        let Some(mut transformation) = popped else {
            return Ok(false);
        };
        self.classes_visited.fetch_add(1, Ordering::Relaxed);

        let old_access = class.access;
        let (class_changed, members) = apply(&mut transformation, class);
        if class_changed || members > 0 {
            self.classes_changed.fetch_add(1, Ordering::Relaxed);
            self.members_changed.fetch_add(members, Ordering::Relaxed);
            debug!(
                class = %class.name,
                old = old_access.bits(),
                new = class.access.bits(),
                members,
                "rewrote access modifiers"
            );
        }

        if let Err(stale) = transformation.ensure_clear() {
            match self.config.policy() {
                StalePolicy::FailFast => return Err(stale.into()),
                StalePolicy::FailAtEnd | StalePolicy::Warn => {
                    lock(&self.stale).extend_from_slice(stale.unmatched());
                }
            }
        }

        Ok(class_changed || members > 0)
    }

    /// Run the completion check and summarize the run.
    ///
    /// Any class bucket never visited is stale, as is any member rule recorded
    /// while transforming.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Stale`] listing every unmatched rule, unless
    /// the policy is [`StalePolicy::Warn`].
    pub fn finish(self) -> Result<TransformReport, TransformError> {
        let rules = self
            .rules
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut unmatched = self
            .stale
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        unmatched.extend(rules.pending());

        let report = TransformReport::new(
            self.classes_visited.into_inner(),
            self.classes_changed.into_inner(),
            self.members_changed.into_inner(),
            unmatched,
        );

        if !report.is_clean() {
            if self.config.policy() != StalePolicy::Warn {
                return Err(StaleRuleError::new(report.unmatched().to_vec()).into());
            }
            for element in report.unmatched() {
                warn!(rule = %element, "access transformer rule matched nothing");
            }
        }

        info!(
            classes_visited = report.classes_visited(),
            classes_changed = report.classes_changed(),
            members_changed = report.members_changed(),
            unmatched = report.unmatched().len(),
            "access transformation finished"
        );
        Ok(report)
    }
}

/// Transform every class in `classes` and run the completion check.
///
/// # Errors
///
/// Returns the first error from [`AccessTransformer::transform_class`] or
/// [`AccessTransformer::finish`].
pub fn transform_all(
    rules: AccessTransformationSet,
    classes: &mut [ClassNode],
    config: TransformerConfig,
) -> Result<TransformReport, TransformError> {
    let transformer = AccessTransformer::with_config(rules, config);
    for class in classes.iter_mut() {
        transformer.transform_class(class)?;
    }
    transformer.finish()
}

fn check_ambiguity(
    transformation: &Transformation,
    class: &ClassNode,
) -> Result<(), AmbiguousOverloadError> {
    for name in transformation.name_only_fields() {
        let candidates: Vec<String> = class
            .fields
            .iter()
            .filter(|field| field.name == name)
            .map(|field| field.descriptor.clone())
            .collect();
        if candidates.len() > 1 {
            return Err(AmbiguousOverloadError {
                class: class.name.clone(),
                name: name.to_owned(),
                candidates,
            });
        }
    }
    Ok(())
}

/// Pop and apply every request matching the class. Returns whether the class
/// flags changed and how many members changed.
fn apply(transformation: &mut Transformation, class: &mut ClassNode) -> (bool, usize) {
    let class_changed = transformation
        .take_access_change()
        .is_some_and(|level| rewrite(&mut class.access, level));

    let mut members = 0;
    if transformation.wants_field_change() {
        for field in &mut class.fields {
            let exact = transformation.pop_field(&field.name, Some(&field.descriptor));
            let by_name = transformation.pop_field(&field.name, None);
            let requested = match (exact, by_name) {
                (Some(a), Some(b)) => Some(a.union(b)),
                (a, b) => a.or(b),
            };
            if let Some(level) = requested {
                members += usize::from(rewrite(&mut field.access, level));
            }
        }
    }

    if transformation.wants_method_change() {
        for method in &mut class.methods {
            if let Some(level) = transformation.pop_method(&method.name, &method.descriptor) {
                members += usize::from(rewrite(&mut method.access, level));
            }
        }
    }

    (class_changed, members)
}
