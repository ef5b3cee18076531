use access_transformer::{
    AccessFlags, AccessTransformationSet, AccessTransformer, ClassNode, StalePolicy,
    TransformerConfig,
};

fn main() {
    let mut rules = AccessTransformationSet::new();
    rules
        .add_rules(
            "core.at",
            "# widen the entry point\npublic net/example/Foo\npublic net/example/Foo/<init> ()V\n",
        )
        .expect("failed to parse core.at");
    rules
        .add_rules("addon.at", "protected-f net/example/Foo/count I\npublic net/example/Gone\n")
        .expect("failed to parse addon.at");

    println!("{rules}");

    let transformer = AccessTransformer::with_config(
        rules,
        TransformerConfig::new().stale_policy(StalePolicy::Warn),
    );

    let mut class = ClassNode::new("net/example/Foo", AccessFlags::SUPER)
        .field("count", "I", AccessFlags::PRIVATE | AccessFlags::FINAL)
        .method("<init>", "()V", AccessFlags::PRIVATE);

    transformer
        .transform_class(&mut class)
        .expect("failed to transform class");

    println!("class:  {:?}", class.access);
    println!("count:  {:?}", class.fields[0].access);
    println!("<init>: {:?}", class.methods[0].access);

    match transformer.finish() {
        Ok(report) => println!("{report}"),
        Err(err) => println!("error: {err}"),
    }
}
