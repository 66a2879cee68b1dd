use serde_json::json;

use super::support::{name_path, spec_with_schemas};
use crate::generator::{
  errors::GeneratorError,
  naming::NameRegistry,
  refs::{ReferenceResolver, ResolutionKind},
};

#[test]
fn test_resolve_direct_component() {
  let spec = spec_with_schemas(json!({ "Pet": { "type": "object" } }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  let (name, kind) = resolver
    .resolve("#/components/schemas/Pet", &name_path(&["root"]), &mut registry)
    .unwrap();
  assert_eq!(name, "Pet");
  assert_eq!(kind, ResolutionKind::Component);
}

#[test]
fn test_resolve_follows_ref_chain_to_target() {
  let spec = spec_with_schemas(json!({
    "PetAlias": { "$ref": "#/components/schemas/Pet" },
    "Pet": { "type": "object" }
  }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  let (name, kind) = resolver
    .resolve("#/components/schemas/PetAlias", &name_path(&["root"]), &mut registry)
    .unwrap();
  assert_eq!(name, "Pet");
  assert_eq!(kind, ResolutionKind::Alias);
}

#[test]
fn test_resolve_missing_component_fails() {
  let spec = spec_with_schemas(json!({ "Pet": { "type": "object" } }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  let err = resolver
    .resolve("#/components/schemas/Ghost", &name_path(&["Pet", "owner"]), &mut registry)
    .unwrap_err();
  match err {
    GeneratorError::UnresolvableReference { ref_path, location } => {
      assert_eq!(ref_path, "#/components/schemas/Ghost");
      assert_eq!(location, "Pet/owner");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_resolve_rejects_unsupported_sections() {
  let spec = spec_with_schemas(json!({ "Pet": { "type": "object" } }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  for ref_path in [
    "#/definitions/Pet",
    "#/components/examples/Pet",
    "https://example.com/schema.json#/Pet",
    "other.yaml#/components/schemas/Pet",
  ] {
    let err = resolver.resolve(ref_path, &name_path(&["root"]), &mut registry).unwrap_err();
    assert!(
      matches!(err, GeneratorError::UnresolvableReference { .. }),
      "expected unresolvable for {ref_path}"
    );
  }
}

#[test]
fn test_resolve_ref_cycle_fails_with_chain() {
  let spec = spec_with_schemas(json!({
    "A": { "$ref": "#/components/schemas/B" },
    "B": { "$ref": "#/components/schemas/A" }
  }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  let err = resolver
    .resolve("#/components/schemas/A", &name_path(&["root"]), &mut registry)
    .unwrap_err();
  match err {
    GeneratorError::ReferenceCycle { chain } => {
      assert_eq!(chain, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_resolve_self_referential_ref_fails() {
  let spec = spec_with_schemas(json!({ "A": { "$ref": "#/components/schemas/A" } }));
  let resolver = ReferenceResolver::new(&spec);
  let mut registry = NameRegistry::new();

  let err = resolver
    .resolve("#/components/schemas/A", &name_path(&["root"]), &mut registry)
    .unwrap_err();
  assert!(matches!(err, GeneratorError::ReferenceCycle { .. }));
}
