use crate::generator::naming::{NameRegistry, NameScope, to_constant_name, to_field_name, to_type_name};

#[test]
fn test_type_name_pascal_case() {
  assert_eq!(to_type_name("pet-store"), "PetStore");
  assert_eq!(to_type_name("listPets"), "ListPets");
  assert_eq!(to_type_name("list_pets_params"), "ListPetsParams");
}

#[test]
fn test_type_name_empty_input() {
  assert_eq!(to_type_name(""), "Unnamed");
  assert_eq!(to_type_name("---"), "Unnamed");
}

#[test]
fn test_type_name_reserved_names_get_suffix() {
  assert_eq!(to_type_name("string"), "StringType");
  assert_eq!(to_type_name("vec"), "VecType");
  assert_eq!(to_type_name("option"), "OptionType");
}

#[test]
fn test_type_name_leading_digit() {
  let name = to_type_name("2d_point");
  assert!(name.starts_with('T'), "got {name}");
}

#[test]
fn test_field_name_snake_case() {
  assert_eq!(to_field_name("petId"), "pet_id");
  assert_eq!(to_field_name("X-Request-Id"), "x_request_id");
}

#[test]
fn test_field_name_keyword_gets_underscore() {
  assert_eq!(to_field_name("type"), "type_");
  assert_eq!(to_field_name("self"), "self_");
}

#[test]
fn test_field_name_empty_and_digit() {
  assert_eq!(to_field_name(""), "_");
  assert!(to_field_name("2fa").starts_with('_'));
}

#[test]
fn test_constant_name() {
  assert_eq!(to_constant_name("bearerAuth"), "BEARER_AUTH");
  assert_eq!(to_constant_name("api-key"), "API_KEY");
}

#[test]
fn test_registry_distinct_sources_never_collide() {
  let mut registry = NameRegistry::new();
  assert_eq!(registry.type_name("foo_bar"), "FooBar");
  assert_eq!(registry.type_name("fooBar"), "FooBar2");
  assert_eq!(registry.type_name("FooBar"), "FooBar3");
}

#[test]
fn test_registry_repeated_claims_are_stable() {
  let mut registry = NameRegistry::new();
  let first = registry.type_name("Pet");
  let second = registry.type_name("Pet");
  assert_eq!(first, second);
}

#[test]
fn test_registry_suffixes_follow_claim_order() {
  let mut a = NameRegistry::new();
  let mut b = NameRegistry::new();
  for source in ["alpha", "Alpha", "ALPHA"] {
    a.type_name(source);
  }
  for source in ["alpha", "Alpha", "ALPHA"] {
    b.type_name(source);
  }
  assert_eq!(a.type_name("alpha"), b.type_name("alpha"));
  assert_eq!(a.type_name("ALPHA"), b.type_name("ALPHA"));
}

#[test]
fn test_scope_claims_unique_names() {
  let mut scope = NameScope::new();
  assert_eq!(scope.claim("value".to_string()), "value");
  assert_eq!(scope.claim("value".to_string()), "value2");
  assert_eq!(scope.claim("value".to_string()), "value3");
}
