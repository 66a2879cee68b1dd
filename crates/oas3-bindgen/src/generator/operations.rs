//! Operation extraction.
//!
//! Walks every path item in sorted path order and produces one
//! [`OperationDefinition`] per HTTP operation: merged parameters, the JSON
//! request body, per-status JSON responses, and the security schemes in
//! effect. Anonymous schemas encountered here (inline bodies, inline
//! response objects, the query-parameter struct) mint type definitions owned
//! by the operation; the collector folds them into the global list.

use std::collections::BTreeSet;

use itertools::Itertools;
use oas3::{
  Spec,
  spec::{ObjectOrReference, Operation, Parameter, ParameterIn, PathItem},
};

use super::{
  errors::GeneratorError,
  model::{
    BodyDefinition, FieldShape, OperationDefinition, ParameterDefinition, ParameterLocation, ResponseDefinition,
    SecurityDefinition, TypeDefinition, TypeShape,
  },
  naming::{NameRegistry, to_field_name},
  synthesizer::SchemaSynthesizer,
};

pub(crate) const JSON_MEDIA_TYPE: &str = "application/json";

pub struct OperationExtractor<'a> {
  spec: &'a Spec,
  synthesizer: SchemaSynthesizer<'a>,
}

impl<'a> OperationExtractor<'a> {
  pub fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      synthesizer: SchemaSynthesizer::new(spec),
    }
  }

  /// Extracts every operation in the document, sorted by path and then by
  /// method name so the output order is reproducible.
  pub fn extract(&self, registry: &mut NameRegistry) -> Result<Vec<OperationDefinition>, GeneratorError> {
    let Some(paths) = self.spec.paths.as_ref() else {
      return Ok(Vec::new());
    };

    let mut operations = Vec::new();

    for (path, item) in paths {
      let methods = item
        .methods()
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

      for (method, operation) in methods {
        operations.push(self.extract_operation(path, item, &method, operation, registry)?);
      }
    }

    Ok(operations)
  }

  fn extract_operation(
    &self,
    path: &str,
    item: &PathItem,
    method: &http::Method,
    operation: &Operation,
    registry: &mut NameRegistry,
  ) -> Result<OperationDefinition, GeneratorError> {
    let operation_id = operation
      .operation_id
      .clone()
      .unwrap_or_else(|| synthesize_operation_id(method, path));
    let generated_name = registry.type_name(&operation_id);
    let name_path = vec![operation_id.clone()];

    let mut type_definitions = Vec::new();

    let parameters = self.collect_parameters(item, operation, &name_path, registry, &mut type_definitions)?;
    mint_params_struct(&operation_id, &parameters, registry, &mut type_definitions);

    let request_body = self.extract_body(operation, &name_path, registry, &mut type_definitions)?;
    let responses = self.extract_responses(operation, &name_path, registry, &mut type_definitions)?;

    Ok(OperationDefinition {
      operation_id,
      generated_name,
      path: path.to_string(),
      method: method.clone(),
      parameters,
      request_body,
      responses,
      security_definitions: self.extract_security(operation),
      type_definitions,
      summary: operation.summary.clone(),
      description: operation.description.clone(),
    })
  }

  /// Path-level parameters first, overridden by operation-level ones that
  /// share a name and location, then sorted by (location, name).
  fn collect_parameters(
    &self,
    item: &PathItem,
    operation: &Operation,
    name_path: &[String],
    registry: &mut NameRegistry,
    type_definitions: &mut Vec<TypeDefinition>,
  ) -> Result<Vec<ParameterDefinition>, GeneratorError> {
    let mut merged: Vec<Parameter> = Vec::new();

    for node in item.parameters.iter().chain(operation.parameters.iter()) {
      let parameter = node
        .resolve(self.spec)
        .map_err(|_| GeneratorError::unresolvable(&node_label(node), name_path))?;
      merged.retain(|seen| !(seen.name == parameter.name && seen.location == parameter.location));
      merged.push(parameter);
    }

    let mut definitions = Vec::new();
    for parameter in merged {
      let location = convert_location(parameter.location);

      let shape = match parameter.schema.as_ref() {
        Some(node) => {
          let mut path = name_path.to_vec();
          path.push(parameter.name.clone());
          let syn = self.synthesizer.synthesize(node, &path, registry)?;
          let syn = self.synthesizer.mint_anonymous(syn, &path, registry);
          type_definitions.extend(syn.aux_types);
          syn.shape
        }
        None => TypeShape::Any,
      };

      definitions.push(ParameterDefinition {
        field_name: to_field_name(&parameter.name),
        source_name: parameter.name,
        location,
        shape,
        required: parameter.required.unwrap_or(location == ParameterLocation::Path),
        description: parameter.description,
      });
    }

    definitions.sort_by(|a, b| (a.location, &a.source_name).cmp(&(b.location, &b.source_name)));
    Ok(definitions)
  }

  /// Only `application/json` bodies are typed; everything else is skipped.
  fn extract_body(
    &self,
    operation: &Operation,
    name_path: &[String],
    registry: &mut NameRegistry,
    type_definitions: &mut Vec<TypeDefinition>,
  ) -> Result<Option<BodyDefinition>, GeneratorError> {
    let Some(node) = operation.request_body.as_ref() else {
      return Ok(None);
    };

    let body = node
      .resolve(self.spec)
      .map_err(|_| GeneratorError::unresolvable(&node_label(node), name_path))?;

    let Some(media) = body.content.get(JSON_MEDIA_TYPE) else {
      return Ok(None);
    };
    let Some(schema) = media.schema.as_ref() else {
      return Ok(None);
    };

    let mut path = name_path.to_vec();
    path.push("body".to_string());
    let syn = self.synthesizer.synthesize(schema, &path, registry)?;
    let syn = self.synthesizer.mint_anonymous(syn, &path, registry);
    type_definitions.extend(syn.aux_types);

    Ok(Some(BodyDefinition {
      shape: syn.shape,
      required: body.required.unwrap_or(false),
    }))
  }

  /// Declared responses in sorted status order. A response without a JSON
  /// schema keeps its status entry with no shape, so callers still see the
  /// status without inventing a type for it.
  fn extract_responses(
    &self,
    operation: &Operation,
    name_path: &[String],
    registry: &mut NameRegistry,
    type_definitions: &mut Vec<TypeDefinition>,
  ) -> Result<Vec<ResponseDefinition>, GeneratorError> {
    let mut definitions = Vec::new();

    let Some(responses) = operation.responses.as_ref() else {
      return Ok(definitions);
    };

    for (status, node) in responses {
      let response = node
        .resolve(self.spec)
        .map_err(|_| GeneratorError::unresolvable(&node_label(node), name_path))?;

      let shape = match response.content.get(JSON_MEDIA_TYPE).and_then(|media| media.schema.as_ref()) {
        Some(schema) => {
          let mut path = name_path.to_vec();
          path.push("response".to_string());
          path.push(status.clone());
          let syn = self.synthesizer.synthesize(schema, &path, registry)?;
          let syn = self.synthesizer.mint_anonymous(syn, &path, registry);
          type_definitions.extend(syn.aux_types);
          Some(syn.shape)
        }
        None => None,
      };

      definitions.push(ResponseDefinition {
        status: status.clone(),
        shape,
      });
    }

    Ok(definitions)
  }

  /// Operation-level security when declared, otherwise the document-wide
  /// default requirements.
  fn extract_security(&self, operation: &Operation) -> Vec<SecurityDefinition> {
    let requirements = if operation.security.is_empty() {
      &self.spec.security
    } else {
      &operation.security
    };

    let mut definitions = Vec::new();
    for requirement in requirements {
      // SecurityRequirement is a newtype over the provider-to-scopes map.
      for (provider_name, scopes) in &requirement.0 {
        definitions.push(SecurityDefinition {
          provider_name: provider_name.clone(),
          scopes: scopes.clone(),
        });
      }
    }
    definitions.sort_by(|a, b| a.provider_name.cmp(&b.provider_name));
    definitions
  }
}

/// Every distinct security provider named anywhere in the operations, for
/// the constants section.
pub fn security_provider_names(operations: &[OperationDefinition]) -> BTreeSet<String> {
  operations
    .iter()
    .flat_map(|op| op.security_definitions.iter())
    .map(|def| def.provider_name.clone())
    .collect()
}

/// A deterministic operation id for operations that omit one:
/// `GET /pets/{petId}` becomes `get_pets_by_pet_id`.
fn synthesize_operation_id(method: &http::Method, path: &str) -> String {
  let mut parts = vec![method.as_str().to_lowercase()];
  for segment in path.split('/').filter(|s| !s.is_empty()) {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(name) => parts.push(format!("by_{}", to_field_name(name))),
      None => parts.push(to_field_name(segment)),
    }
  }
  parts.join("_")
}

/// Builds the `{Name}Params` struct for an operation's query and header
/// parameters. Path parameters stay positional and never join the struct.
fn mint_params_struct(
  operation_id: &str,
  parameters: &[ParameterDefinition],
  registry: &mut NameRegistry,
  type_definitions: &mut Vec<TypeDefinition>,
) {
  let fields: Vec<FieldShape> = parameters
    .iter()
    .filter(|p| matches!(p.location, ParameterLocation::Query | ParameterLocation::Header))
    .map(|p| FieldShape {
      source_name: p.source_name.clone(),
      field_name: p.field_name.clone(),
      shape: p.shape.clone(),
      optional: !p.required,
      description: p.description.clone(),
    })
    .collect();

  if fields.is_empty() {
    return;
  }

  let source_name = format!("{operation_id}_params");
  let generated_name = registry.type_name(&source_name);
  type_definitions.push(TypeDefinition {
    source_name,
    generated_name,
    shape: TypeShape::Struct { fields },
    has_additional_properties: false,
    additional_value: None,
    description: None,
  });
}

fn convert_location(location: ParameterIn) -> ParameterLocation {
  match location {
    ParameterIn::Path => ParameterLocation::Path,
    ParameterIn::Query => ParameterLocation::Query,
    ParameterIn::Header => ParameterLocation::Header,
    ParameterIn::Cookie => ParameterLocation::Cookie,
  }
}

fn node_label<T>(node: &ObjectOrReference<T>) -> String {
  match node {
    ObjectOrReference::Ref { ref_path, .. } => ref_path.clone(),
    ObjectOrReference::Object(_) => "inline".to_string(),
  }
}
