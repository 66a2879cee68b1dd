//! Component collection.
//!
//! Walks the component sections in sorted name order, synthesizes each
//! entry into a named [`TypeDefinition`], and folds in the auxiliary
//! definitions minted for anonymous sub-schemas. Schemas carry their
//! schema directly; parameters contribute their schema, and responses and
//! request bodies contribute their `application/json` schema only.
//! Operation-owned definitions are merged in afterwards by
//! [`TypeCollector::finalize`].

use oas3::{
  Spec,
  spec::{Components, ObjectOrReference, ObjectSchema},
};

use super::{
  errors::GeneratorError,
  model::{CollectedTypes, OperationDefinition, TypeDefinition, TypeShape},
  naming::NameRegistry,
  operations::JSON_MEDIA_TYPE,
  synthesizer::SchemaSynthesizer,
};

pub struct TypeCollector<'a> {
  spec: &'a Spec,
  synthesizer: SchemaSynthesizer<'a>,
}

impl<'a> TypeCollector<'a> {
  pub fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      synthesizer: SchemaSynthesizer::new(spec),
    }
  }

  /// Synthesizes every non-excluded component into a type definition.
  ///
  /// Every component name is claimed in the registry before any synthesis
  /// runs, so collision suffixes depend only on the sorted component lists
  /// and never on synthesis order. The exclusion filter applies to schemas
  /// only.
  pub fn collect(
    &self,
    exclude_schemas: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Vec<TypeDefinition>, GeneratorError> {
    let Some(components) = self.spec.components.as_ref() else {
      return Ok(Vec::new());
    };

    for name in components
      .schemas
      .keys()
      .filter(|name| !exclude_schemas.contains(name))
      .chain(components.parameters.keys())
      .chain(components.responses.keys())
      .chain(components.request_bodies.keys())
    {
      registry.type_name(name);
    }

    let mut definitions = Vec::new();

    for (name, node) in &components.schemas {
      if exclude_schemas.contains(name) {
        continue;
      }
      self.define_entry(name, node, registry, &mut definitions)?;
    }

    self.collect_parameters(components, registry, &mut definitions)?;
    self.collect_responses(components, registry, &mut definitions)?;
    self.collect_request_bodies(components, registry, &mut definitions)?;

    Ok(definitions)
  }

  /// Component parameters with a declared schema become named types; a
  /// parameter without one has nothing to type.
  fn collect_parameters(
    &self,
    components: &Components,
    registry: &mut NameRegistry,
    definitions: &mut Vec<TypeDefinition>,
  ) -> Result<(), GeneratorError> {
    for (name, node) in &components.parameters {
      match node {
        ObjectOrReference::Ref { ref_path, .. } => self.define_alias(name, ref_path, registry, definitions)?,
        ObjectOrReference::Object(parameter) => {
          let Some(schema) = parameter.schema.as_ref() else {
            continue;
          };
          self.define_entry(name, schema, registry, definitions)?;
        }
      }
    }
    Ok(())
  }

  fn collect_responses(
    &self,
    components: &Components,
    registry: &mut NameRegistry,
    definitions: &mut Vec<TypeDefinition>,
  ) -> Result<(), GeneratorError> {
    for (name, node) in &components.responses {
      match node {
        ObjectOrReference::Ref { ref_path, .. } => self.define_alias(name, ref_path, registry, definitions)?,
        ObjectOrReference::Object(response) => {
          let Some(schema) = response.content.get(JSON_MEDIA_TYPE).and_then(|media| media.schema.as_ref()) else {
            continue;
          };
          self.define_entry(name, schema, registry, definitions)?;
        }
      }
    }
    Ok(())
  }

  fn collect_request_bodies(
    &self,
    components: &Components,
    registry: &mut NameRegistry,
    definitions: &mut Vec<TypeDefinition>,
  ) -> Result<(), GeneratorError> {
    for (name, node) in &components.request_bodies {
      match node {
        ObjectOrReference::Ref { ref_path, .. } => self.define_alias(name, ref_path, registry, definitions)?,
        ObjectOrReference::Object(body) => {
          let Some(schema) = body.content.get(JSON_MEDIA_TYPE).and_then(|media| media.schema.as_ref()) else {
            continue;
          };
          self.define_entry(name, schema, registry, definitions)?;
        }
      }
    }
    Ok(())
  }

  /// Synthesizes one named schema-or-reference entry into a definition.
  fn define_entry(
    &self,
    name: &str,
    node: &ObjectOrReference<ObjectSchema>,
    registry: &mut NameRegistry,
    definitions: &mut Vec<TypeDefinition>,
  ) -> Result<(), GeneratorError> {
    match node {
      // A component that is itself a reference renders as a type alias.
      ObjectOrReference::Ref { ref_path, .. } => self.define_alias(name, ref_path, registry, definitions),
      ObjectOrReference::Object(schema) => {
        let generated_name = registry.type_name(name);
        let name_path = vec![name.to_string()];
        let syn = self.synthesizer.synthesize_schema(schema, &name_path, registry)?;
        definitions.extend(syn.aux_types);
        definitions.push(TypeDefinition {
          source_name: name.to_string(),
          generated_name,
          shape: syn.shape,
          has_additional_properties: syn.has_additional_properties,
          additional_value: syn.additional_value,
          description: schema.description.clone(),
        });
        Ok(())
      }
    }
  }

  fn define_alias(
    &self,
    name: &str,
    ref_path: &str,
    registry: &mut NameRegistry,
    definitions: &mut Vec<TypeDefinition>,
  ) -> Result<(), GeneratorError> {
    let generated_name = registry.type_name(name);
    let name_path = vec![name.to_string()];
    let (target, _kind) = self.synthesizer.resolver().resolve(ref_path, &name_path, registry)?;

    // A component that just re-points at an identically named type would
    // alias to itself; the target definition already covers it.
    if generated_name == target {
      return Ok(());
    }

    definitions.push(TypeDefinition {
      source_name: name.to_string(),
      generated_name,
      shape: TypeShape::Reference(target),
      has_additional_properties: false,
      additional_value: None,
      description: None,
    });
    Ok(())
  }

  /// Appends operation-owned definitions to the component list, drops
  /// duplicate generated names (first declaration wins), and splits out the
  /// additional-properties subset in list order.
  pub fn finalize(component_types: Vec<TypeDefinition>, operations: &[OperationDefinition]) -> CollectedTypes {
    let mut types = component_types;
    for operation in operations {
      types.extend(operation.type_definitions.iter().cloned());
    }

    let mut seen = std::collections::BTreeSet::new();
    types.retain(|def| seen.insert(def.generated_name.clone()));

    let additional_property_types = types.iter().filter(|def| def.has_additional_properties).cloned().collect();

    CollectedTypes {
      types,
      additional_property_types,
    }
  }
}
