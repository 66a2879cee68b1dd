use oas3::{Spec, spec::ObjectSchema};
use serde_json::{Value, json};

pub(super) fn spec_from_json(value: Value) -> Spec {
  serde_json::from_value(value).unwrap()
}

pub(super) fn spec_with_schemas(schemas: Value) -> Spec {
  spec_from_json(json!({
    "openapi": "3.0.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "paths": {},
    "components": { "schemas": schemas }
  }))
}

pub(super) fn schema_from_json(value: Value) -> ObjectSchema {
  serde_json::from_value(value).unwrap()
}

pub(super) fn name_path(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|p| (*p).to_string()).collect()
}

/// A small but complete document exercising components, parameters, bodies,
/// typed and untyped responses, and a default response.
pub(super) fn petstore() -> Spec {
  spec_from_json(json!({
    "openapi": "3.0.0",
    "info": { "title": "Swagger Petstore", "version": "1.0.0" },
    "paths": {
      "/pets": {
        "get": {
          "operationId": "listPets",
          "summary": "List all pets",
          "parameters": [
            { "name": "limit", "in": "query", "required": false,
              "schema": { "type": "integer", "format": "int32" } }
          ],
          "responses": {
            "200": {
              "description": "A paged array of pets",
              "content": { "application/json": {
                "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
              } }
            },
            "default": {
              "description": "Unexpected error",
              "content": { "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" }
              } }
            }
          }
        },
        "post": {
          "operationId": "createPet",
          "requestBody": {
            "required": true,
            "content": { "application/json": {
              "schema": { "$ref": "#/components/schemas/Pet" }
            } }
          },
          "responses": { "201": { "description": "Created" } }
        }
      },
      "/pets/{petId}": {
        "get": {
          "operationId": "getPet",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } }
          ],
          "responses": {
            "200": {
              "description": "A single pet",
              "content": { "application/json": {
                "schema": { "$ref": "#/components/schemas/Pet" }
              } }
            }
          }
        }
      }
    },
    "components": {
      "schemas": {
        "Pet": {
          "type": "object",
          "required": ["id", "name"],
          "properties": {
            "id": { "type": "integer", "format": "int64" },
            "name": { "type": "string" },
            "tag": { "type": "string" }
          }
        },
        "Error": {
          "type": "object",
          "required": ["code", "message"],
          "properties": {
            "code": { "type": "integer", "format": "int32" },
            "message": { "type": "string" }
          }
        }
      }
    }
  }))
}
