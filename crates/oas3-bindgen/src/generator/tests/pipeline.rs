use serde_json::json;

use super::support::{petstore, spec_from_json, spec_with_schemas};
use crate::generator::{GenerateOptions, Generator};

fn all_sections() -> GenerateOptions {
  GenerateOptions {
    generate_types: true,
    generate_client: true,
    generate_server: true,
    exclude_schemas: Vec::new(),
  }
}

fn types_only() -> GenerateOptions {
  GenerateOptions {
    generate_types: true,
    ..GenerateOptions::default()
  }
}

#[test]
fn test_petstore_generates_all_sections() {
  let generator = Generator::new(petstore(), all_sections());
  let (code, stats) = generator.generate().unwrap();

  assert!(code.contains("pub struct Pet"), "missing Pet:\n{code}");
  assert!(code.contains("pub struct Error"));
  assert!(code.contains("pub struct ListPetsParams"));
  assert!(code.contains("pub async fn list_pets"));
  assert!(code.contains("pub struct ListPetsResponse"));
  assert!(code.contains("pub trait Api"));
  assert!(code.contains("pub fn router"));
  assert!(code.contains("/pets/{pet_id}"));

  assert_eq!(stats.types_generated, 3);
  assert_eq!(stats.operations_converted, 3);
}

#[test]
fn test_generation_is_deterministic() {
  let first = Generator::new(petstore(), all_sections()).generate().unwrap().0;
  let second = Generator::new(petstore(), all_sections()).generate().unwrap().0;
  assert_eq!(first, second);
}

#[test]
fn test_sections_are_opt_in() {
  let generator = Generator::new(petstore(), types_only());
  let (code, _) = generator.generate().unwrap();

  assert!(code.contains("pub struct Pet"));
  assert!(!code.contains("pub struct Client"));
  assert!(!code.contains("pub trait Api"));
}

#[test]
fn test_excluded_schema_is_not_rendered() {
  let options = GenerateOptions {
    generate_types: true,
    exclude_schemas: vec!["Error".to_string()],
    ..GenerateOptions::default()
  };
  let generator = Generator::new(petstore(), options);
  let (code, _) = generator.generate().unwrap();

  assert!(code.contains("pub struct Pet"));
  assert!(!code.contains("pub struct Error"));
  // Operation responses still reference the excluded name.
  let generator = Generator::new(petstore(), all_sections());
  let (full, _) = generator.generate().unwrap();
  assert!(full.contains("Option<Error>"));
}

#[test]
fn test_optional_fields_render_as_option_with_skip() {
  let generator = Generator::new(petstore(), types_only());
  let (code, _) = generator.generate().unwrap();

  assert!(code.contains("pub tag: Option<String>"));
  assert!(code.contains("skip_serializing_if = \"Option::is_none\""));
  assert!(code.contains("pub id: i64"));
}

#[test]
fn test_map_component_renders_as_type_alias() {
  let spec = spec_with_schemas(json!({
    "Labels": { "type": "object", "additionalProperties": { "type": "string" } }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();
  assert!(
    code.contains("pub type Labels = std::collections::HashMap<String, String>;"),
    "got:\n{code}"
  );
}

#[test]
fn test_struct_with_additional_properties_gets_glue() {
  let spec = spec_with_schemas(json!({
    "Counters": {
      "type": "object",
      "required": ["name"],
      "properties": { "name": { "type": "string" } },
      "additionalProperties": { "type": "integer" }
    }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();

  assert!(code.contains("#[serde(flatten)]"));
  assert!(code.contains("pub additional_properties: std::collections::HashMap<String, i64>"));
  assert!(code.contains("pub fn additional_property(&self, key: &str) -> Option<&i64>"));
  assert!(code.contains("pub fn set_additional_property("));
}

#[test]
fn test_enum_component_renders_with_renames() {
  let spec = spec_with_schemas(json!({
    "Status": { "type": "string", "enum": ["available", "sold-out"] }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();

  assert!(code.contains("pub enum Status"));
  assert!(code.contains("#[serde(rename = \"sold-out\")]"));
  assert!(code.contains("SoldOut"));
}

#[test]
fn test_union_component_renders_untagged() {
  let spec = spec_with_schemas(json!({
    "Cat": { "type": "object", "properties": { "meow": { "type": "boolean" } } },
    "Dog": { "type": "object", "properties": { "bark": { "type": "boolean" } } },
    "Animal": {
      "oneOf": [
        { "$ref": "#/components/schemas/Cat" },
        { "$ref": "#/components/schemas/Dog" }
      ]
    }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();

  assert!(code.contains("#[serde(untagged)]"));
  assert!(code.contains("pub enum Animal"));
  assert!(code.contains("Cat(Cat)"));
}

#[test]
fn test_security_providers_emit_scope_constants() {
  let spec = spec_from_json(json!({
    "openapi": "3.0.0",
    "info": { "title": "t", "version": "1" },
    "security": [ { "bearerAuth": [] } ],
    "paths": {
      "/a": {
        "get": { "operationId": "getA", "responses": { "200": { "description": "ok" } } }
      }
    }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();
  assert!(
    code.contains("pub const BEARER_AUTH_SCOPES: &str = \"bearerAuth.Scopes\";"),
    "got:\n{code}"
  );
}

#[test]
fn test_all_of_cycle_surfaces_error() {
  let spec = spec_with_schemas(json!({
    "A": { "allOf": [ { "$ref": "#/components/schemas/B" } ] },
    "B": { "allOf": [ { "$ref": "#/components/schemas/A" } ] }
  }));
  let result = Generator::new(spec, types_only()).generate();
  assert!(result.is_err());
}

#[test]
fn test_component_sections_counted_in_stats() {
  let spec = spec_from_json(json!({
    "openapi": "3.0.0",
    "info": { "title": "t", "version": "1" },
    "paths": {},
    "components": {
      "parameters": {
        "PageLimit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
      },
      "responses": {
        "ErrorResponse": {
          "description": "err",
          "content": { "application/json": {
            "schema": { "type": "object", "properties": { "message": { "type": "string" } } }
          } }
        }
      },
      "requestBodies": {
        "CreateNote": {
          "content": { "application/json": {
            "schema": { "type": "object", "properties": { "text": { "type": "string" } } }
          } }
        }
      }
    }
  }));
  let (code, stats) = Generator::new(spec, types_only()).generate().unwrap();

  assert_eq!(stats.types_generated, 3);
  assert!(code.contains("pub type PageLimit = i64;"), "got:\n{code}");
  assert!(code.contains("pub struct ErrorResponse"));
  assert!(code.contains("pub struct CreateNote"));
}

#[test]
fn test_reference_cycle_surfaces_error() {
  let spec = spec_with_schemas(json!({
    "A": { "$ref": "#/components/schemas/B" },
    "B": { "$ref": "#/components/schemas/A" }
  }));
  let result = Generator::new(spec, types_only()).generate();
  assert!(result.is_err());
}

#[test]
fn test_recursive_struct_generates_successfully() {
  let spec = spec_with_schemas(json!({
    "Node": {
      "type": "object",
      "properties": {
        "value": { "type": "string" },
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    }
  }));
  let (code, _) = Generator::new(spec, types_only()).generate().unwrap();
  assert!(code.contains("pub struct Node"));
  assert!(code.contains("Vec<Node>"));
}
