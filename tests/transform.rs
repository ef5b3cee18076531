use access_transformer::{
    transform_all, AccessFlags, AccessTransformationSet, AccessTransformer, ClassNode,
    ElementReference, StalePolicy, TransformError, TransformerConfig,
};

fn foo() -> ClassNode {
    ClassNode::new("net/example/Foo", AccessFlags::SUPER)
        .field("count", "I", AccessFlags::PRIVATE)
        .field(
            "NAME",
            "Ljava/lang/String;",
            AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL,
        )
        .method("<init>", "()V", AccessFlags::PRIVATE)
        .method("bar", "(I)V", AccessFlags::PROTECTED | AccessFlags::FINAL)
}

#[test]
fn package_private_class_becomes_public() {
    let rules = AccessTransformationSet::from_rules("mod.at", "public net/example/Foo").unwrap();
    let transformer = AccessTransformer::new(rules);

    let mut class = foo();
    assert!(transformer.transform_class(&mut class).unwrap());
    assert_eq!(class.access, AccessFlags::SUPER | AccessFlags::PUBLIC);

    let report = transformer.finish().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.classes_visited(), 1);
    assert_eq!(report.classes_changed(), 1);
    assert_eq!(report.members_changed(), 0);
}

#[test]
fn missing_method_is_stale() {
    let rules =
        AccessTransformationSet::from_rules("mod.at", "public net/example/Foo/bar ()V").unwrap();
    let transformer = AccessTransformer::new(rules);

    let mut class = foo();
    assert!(!transformer.transform_class(&mut class).unwrap());

    match transformer.finish() {
        Err(TransformError::Stale(err)) => {
            assert_eq!(
                err.unmatched(),
                &[ElementReference::method("net/example/Foo", "bar", "()V")]
            );
            assert!(err.to_string().contains("net/example/Foo/bar ()V"));
        }
        other => panic!("expected stale rule error, got {other:?}"),
    }
}

#[test]
fn merged_class_rules_take_widest() {
    let mut rules = AccessTransformationSet::new();
    rules.add_rules("a.at", "protected net/example/Foo").unwrap();
    rules.add_rules("b.at", "public net/example/Foo").unwrap();
    assert_eq!(
        rules
            .get("net/example/Foo")
            .and_then(|t| t.access_change())
            .map(|l| l.to_string()),
        Some("public".to_owned())
    );

    let mut classes = vec![foo()];
    transform_all(rules, &mut classes, TransformerConfig::default()).unwrap();
    assert!(classes[0].access.contains(AccessFlags::PUBLIC));
}

#[test]
fn non_final_request_on_public_final_class() {
    let rules =
        AccessTransformationSet::from_rules("mod.at", "protected-f net/example/Foo").unwrap();
    let mut classes = vec![ClassNode::new(
        "net/example/Foo",
        AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SUPER,
    )];
    transform_all(rules, &mut classes, TransformerConfig::default()).unwrap();
    assert_eq!(classes[0].access, AccessFlags::PUBLIC | AccessFlags::SUPER);
}

#[test]
fn members_widened_and_others_untouched() {
    let rules = AccessTransformationSet::from_rules(
        "mod.at",
        "# open up the constructor and the counter\n\
         public net/example/Foo/<init> ()V\n\
         protected-f net/example/Foo/count I\n\
         public-f net/example/Foo/bar (I)V\n",
    )
    .unwrap();
    let mut classes = vec![foo()];
    let report = transform_all(rules, &mut classes, TransformerConfig::default()).unwrap();

    let class = &classes[0];
    assert_eq!(class.access, AccessFlags::SUPER);
    assert_eq!(class.fields[0].access, AccessFlags::PROTECTED);
    assert_eq!(
        class.fields[1].access,
        AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL
    );
    assert_eq!(class.methods[0].access, AccessFlags::PUBLIC);
    assert_eq!(class.methods[1].access, AccessFlags::PUBLIC);
    assert_eq!(report.members_changed(), 3);
    assert_eq!(report.classes_changed(), 1);
}

#[test]
fn unvisited_class_fails_completion_check() {
    let rules = AccessTransformationSet::from_rules(
        "mod.at",
        "public net/example/Foo\npublic net/example/Gone\npublic net/example/Gone/run ()V",
    )
    .unwrap();
    let mut classes = vec![foo()];
    let err = transform_all(rules, &mut classes, TransformerConfig::default()).unwrap_err();
    match err {
        TransformError::Stale(err) => assert_eq!(
            err.unmatched(),
            &[
                ElementReference::class("net/example/Gone"),
                ElementReference::method("net/example/Gone", "run", "()V"),
            ]
        ),
        other => panic!("expected stale rule error, got {other:?}"),
    }
    // Classes that were present still got rewritten.
    assert!(classes[0].access.contains(AccessFlags::PUBLIC));
}

#[test]
fn fail_at_end_collects_every_class() {
    let rules = AccessTransformationSet::from_rules(
        "mod.at",
        "public a/A/missing ()V\npublic b/B/missing I\npublic b/B",
    )
    .unwrap();
    let transformer = AccessTransformer::new(rules);
    let mut a = ClassNode::new("a/A", AccessFlags::empty());
    let mut b = ClassNode::new("b/B", AccessFlags::empty());
    transformer.transform_class(&mut a).unwrap();
    transformer.transform_class(&mut b).unwrap();
    assert!(b.access.contains(AccessFlags::PUBLIC));

    let err = transformer.finish().unwrap_err();
    match err {
        TransformError::Stale(err) => assert_eq!(err.unmatched().len(), 2),
        other => panic!("expected stale rule error, got {other:?}"),
    }
}

#[test]
fn fail_fast_stops_at_first_stale_class() {
    let rules = AccessTransformationSet::from_rules("mod.at", "public a/A/missing ()V").unwrap();
    let transformer = AccessTransformer::with_config(
        rules,
        TransformerConfig::new().stale_policy(StalePolicy::FailFast),
    );
    let mut a = ClassNode::new("a/A", AccessFlags::empty());
    assert!(matches!(
        transformer.transform_class(&mut a),
        Err(TransformError::Stale(_))
    ));
}

#[test]
fn warn_policy_reports_instead_of_failing() {
    let rules = AccessTransformationSet::from_rules(
        "mod.at",
        "public net/example/Foo\npublic net/example/Foo/bar ()V\npublic x/Y",
    )
    .unwrap();
    let mut classes = vec![foo()];
    let report = transform_all(
        rules,
        &mut classes,
        TransformerConfig::new().stale_policy(StalePolicy::Warn),
    )
    .unwrap();

    assert!(classes[0].access.contains(AccessFlags::PUBLIC));
    assert_eq!(
        report.unmatched(),
        &[
            ElementReference::class("x/Y"),
            ElementReference::method("net/example/Foo", "bar", "()V"),
        ]
    );
}

#[test]
fn second_pass_changes_nothing() {
    let text = "public net/example/Foo\nprotected-f net/example/Foo/bar (I)V\nprivate+f net/example/Foo/count I";
    let mut classes = vec![foo()];
    transform_all(
        AccessTransformationSet::from_rules("mod.at", text).unwrap(),
        &mut classes,
        TransformerConfig::default(),
    )
    .unwrap();
    let after_first = classes.clone();

    let report = transform_all(
        AccessTransformationSet::from_rules("mod.at", text).unwrap(),
        &mut classes,
        TransformerConfig::default(),
    )
    .unwrap();
    assert_eq!(classes, after_first);
    assert_eq!(report.classes_changed(), 0);
    assert_eq!(report.members_changed(), 0);
}
