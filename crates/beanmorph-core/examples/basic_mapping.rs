// Map a source bean onto a mutable and an immutable destination
// Usage: cargo run --example basic_mapping [types.json]
// Set RUST_LOG=beanmorph_core=trace to see every field decision.

use beanmorph_core::{
    BeanTransformer, FieldTransformer, Instance, ScalarKind, TypeRef, TypeRegistry,
    TypeShapeBuilder, Value,
};
use std::env;
use std::sync::Arc;

fn default_registry() -> anyhow::Result<TypeRegistry> {
    let registry = TypeRegistry::new();
    registry
        .register(
            TypeShapeBuilder::new("FromFoo")
                .property("name", TypeRef::String)
                .property("id", TypeRef::BigInteger)
                .property("phones", TypeRef::seq(TypeRef::Primitive(ScalarKind::Int)))
                .default_constructor()
                .build()?,
        )
        .register(
            TypeShapeBuilder::new("MutableToFoo")
                .property("name", TypeRef::String)
                .property("id", TypeRef::BigInteger)
                .property("phones", TypeRef::seq(TypeRef::Boxed(ScalarKind::Long)))
                .default_constructor()
                .build()?,
        )
        .register(
            TypeShapeBuilder::new("ImmutableToFoo")
                .property("name", TypeRef::String)
                .property("id", TypeRef::BigInteger)
                .all_args_constructor()
                .build()?,
        );
    Ok(registry)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Optional JSON document with extra type shapes
    let registry = match env::args().nth(1) {
        Some(path) => TypeRegistry::from_file(path)?,
        None => default_registry()?,
    };

    let source = Instance::new("FromFoo")
        .with("name", "Goofy")
        .with("id", Value::BigInteger(1234))
        .with("phones", vec![12345, 6892, 10873])
        .into_value();

    let mut transformer = BeanTransformer::new(Arc::new(registry));
    let mutable = transformer.transform_to(&source, "MutableToFoo")?;
    println!("MutableToFoo:   {}", mutable.to_json());

    transformer.with_field_transformer(FieldTransformer::new("name", |v| {
        Value::from(format!("prefix-{}", v.as_str().unwrap_or_default()))
    }));
    let immutable = transformer.transform_to(&source, "ImmutableToFoo")?;
    println!("ImmutableToFoo: {}", immutable.to_json());

    Ok(())
}
