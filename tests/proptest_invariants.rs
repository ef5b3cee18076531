
use access_transformer::{
    current_level, widen, AccessFlags, AccessTransformationSet, AccessTransformer, ClassNode,
    ElementReference, Finality, StalePolicy, TransformerConfig,
};
use proptest::prelude::*;
use strategies::{arb_all_classes, arb_flags, arb_level, arb_source};

fn load<S: AsRef<str>>(sources: &[S]) -> AccessTransformationSet {
    let mut set = AccessTransformationSet::new();
    for (i, text) in sources.iter().enumerate() {
        set.add_rules(&format!("source_{i}.at"), text.as_ref())
            .expect("generated rules should parse");
    }
    set
}

fn run(rules: AccessTransformationSet, classes: &mut [ClassNode]) {
    let config = TransformerConfig::new().stale_policy(StalePolicy::Warn);
    let transformer = AccessTransformer::with_config(rules, config);
    for class in classes.iter_mut() {
        transformer
            .transform_class(class)
            .expect("pooled classes are never ambiguous");
    }
    let report = transformer.finish().expect("warn policy never fails");
    assert!(report.is_clean(), "every pooled member exists: {report}");
}

// ---------------------------------------------------------------------------
// Invariant 1: Union is a join
//
// Commutative, associative, idempotent, and never narrower than either side.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn union_commutative(a in arb_level(), b in arb_level()) {
        prop_assert_eq!(a.union(b), b.union(a));
    }

    #[test]
    fn union_associative(a in arb_level(), b in arb_level(), c in arb_level()) {
        prop_assert_eq!(a.union(b).union(c), a.union(b.union(c)));
    }

    #[test]
    fn union_idempotent(a in arb_level()) {
        prop_assert_eq!(a.union(a), a);
    }

    #[test]
    fn union_never_narrows(a in arb_level(), b in arb_level()) {
        let u = a.union(b);
        prop_assert!(u.visibility() >= a.visibility());
        prop_assert!(u.visibility() >= b.visibility());
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Widening never restricts
//
// Visibility never drops, `final` only disappears on an explicit `-f`, and
// bits other than visibility/final are untouched.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn widen_never_reduces_visibility(flags in arb_flags(), level in arb_level()) {
        let out = widen(flags, level);
        prop_assert!(current_level(out).visibility() >= current_level(flags).visibility());
        prop_assert!(current_level(out).visibility() >= level.visibility());
    }

    #[test]
    fn widen_keeps_final_unless_asked(flags in arb_flags(), level in arb_level()) {
        let out = widen(flags, level);
        if flags.contains(AccessFlags::FINAL) && level.finality() != Finality::ForceNonFinal {
            prop_assert!(out.contains(AccessFlags::FINAL));
        }
        if level.finality() == Finality::ForceNonFinal {
            prop_assert!(!out.contains(AccessFlags::FINAL));
        }
    }

    #[test]
    fn widen_preserves_other_bits(flags in arb_flags(), level in arb_level()) {
        let untouched = !(AccessFlags::VISIBILITY | AccessFlags::FINAL);
        prop_assert_eq!(widen(flags, level) & untouched, flags & untouched);
    }

    #[test]
    fn widen_sets_at_most_one_visibility_bit(flags in arb_flags(), level in arb_level()) {
        let bits = (widen(flags, level) & AccessFlags::VISIBILITY).bits();
        prop_assert!(bits.count_ones() <= 1);
    }

    #[test]
    fn widen_idempotent(flags in arb_flags(), level in arb_level()) {
        let once = widen(flags, level);
        prop_assert_eq!(widen(once, level), once);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Order independence
//
// Loading the same sources in any order, or loading them separately and
// merging, yields the same set.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn source_order_irrelevant(a in arb_source(), b in arb_source(), c in arb_source()) {
        let forward = load(&[&a, &b, &c]);
        let backward = load(&[&c, &b, &a]);
        prop_assert_eq!(forward.entries(), backward.entries());
        prop_assert_eq!(&forward, &backward);
    }

    #[test]
    fn merge_equals_sequential(a in arb_source(), b in arb_source()) {
        let sequential = load(&[&a, &b]);
        let mut merged = load(&[&b]);
        merged.merge(load(&[&a]));
        prop_assert_eq!(sequential, merged);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Whole-run idempotence
//
// Re-applying the same rules to already-transformed classes changes nothing.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn reapplying_rules_is_a_no_op(source in arb_source(), classes in arb_all_classes()) {
        let mut once = classes;
        run(load(&[&source]), &mut once);

        let mut twice = once.clone();
        run(load(&[&source]), &mut twice);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn transformed_members_satisfy_their_rule(source in arb_source(), classes in arb_all_classes()) {
        let rules = load(&[&source]);
        let expected = rules.entries();
        let mut classes = classes;
        run(rules, &mut classes);

        for (element, level) in expected {
            let class = classes
                .iter()
                .find(|c| c.name == element.owner())
                .expect("pooled class");
            let flags = match &element {
                ElementReference::Class { .. } => class.access,
                ElementReference::Field { name, descriptor, .. } => class
                    .fields
                    .iter()
                    .find(|f| {
                        &f.name == name
                            && descriptor.as_ref().map_or(true, |d| &f.descriptor == d)
                    })
                    .expect("pooled field")
                    .access,
                ElementReference::Method { name, descriptor, .. } => class
                    .methods
                    .iter()
                    .find(|m| &m.name == name && &m.descriptor == descriptor)
                    .expect("pooled method")
                    .access,
            };
            prop_assert!(current_level(flags).visibility() >= level.visibility());
        }
    }
}
