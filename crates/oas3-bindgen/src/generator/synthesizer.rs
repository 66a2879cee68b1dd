//! Schema-to-type synthesis.
//!
//! Converts one schema node into a [`TypeShape`], minting auxiliary named
//! type definitions for anonymous sub-schemas (an inline object inside an
//! array item, an inline enum property) along the way. Reference nodes
//! short-circuit through the resolver and never recurse; the one place a
//! reference is expanded in place, `allOf` merging, tracks the names it is
//! expanding so a cyclic composition fails instead of recursing forever.

use std::cell::RefCell;

use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Schema, SchemaType, SchemaTypeSet},
};

use super::{
  errors::GeneratorError,
  model::{EnumConstant, FieldShape, Primitive, TypeDefinition, TypeShape, UnionVariant},
  naming::{NameRegistry, NameScope, to_field_name, to_type_name},
  refs::ReferenceResolver,
};

/// The result of synthesizing one schema node.
#[derive(Debug, Clone)]
pub struct Synthesis {
  pub shape: TypeShape,
  /// Named definitions minted for anonymous sub-schemas, in minting order.
  pub aux_types: Vec<TypeDefinition>,
  pub has_additional_properties: bool,
  pub additional_value: Option<TypeShape>,
}

impl Synthesis {
  fn plain(shape: TypeShape) -> Self {
    Self {
      shape,
      aux_types: Vec::new(),
      has_additional_properties: false,
      additional_value: None,
    }
  }
}

pub struct SchemaSynthesizer<'a> {
  spec: &'a Spec,
  resolver: ReferenceResolver<'a>,
  /// Component names currently being inline-expanded by `allOf` merging.
  expanding: RefCell<Vec<String>>,
}

impl<'a> SchemaSynthesizer<'a> {
  pub fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      resolver: ReferenceResolver::new(spec),
      expanding: RefCell::new(Vec::new()),
    }
  }

  pub fn resolver(&self) -> &ReferenceResolver<'a> {
    &self.resolver
  }

  /// Synthesizes a schema-or-reference node. `name_path` is the naming
  /// context (enclosing schema name, property name, ...) for anonymous
  /// sub-schemas.
  pub fn synthesize(
    &self,
    node: &ObjectOrReference<ObjectSchema>,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    match node {
      ObjectOrReference::Ref { ref_path, .. } => {
        let (name, _kind) = self.resolver.resolve(ref_path, name_path, registry)?;
        Ok(Synthesis::plain(TypeShape::Reference(name)))
      }
      ObjectOrReference::Object(schema) => self.synthesize_schema(schema, name_path, registry),
    }
  }

  /// Synthesizes a concrete (non-reference) schema.
  pub fn synthesize_schema(
    &self,
    schema: &ObjectSchema,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    if !schema.all_of.is_empty() {
      return self.merge_all_of(schema, name_path, registry);
    }
    if !schema.one_of.is_empty() {
      return self.union_of(&schema.one_of, name_path, registry);
    }
    if !schema.any_of.is_empty() {
      return self.union_of(&schema.any_of, name_path, registry);
    }
    if !schema.enum_values.is_empty() {
      return Ok(enum_of(&schema.enum_values));
    }

    match schema.schema_type.as_ref() {
      Some(SchemaTypeSet::Single(SchemaType::Array)) => self.synthesize_array(schema, name_path, registry),
      Some(SchemaTypeSet::Single(SchemaType::Object)) => self.synthesize_object(schema, name_path, registry),
      Some(SchemaTypeSet::Single(SchemaType::Null)) => Ok(Synthesis::plain(TypeShape::Any)),
      Some(SchemaTypeSet::Single(typ)) => Ok(Synthesis::plain(primitive_shape(*typ, schema.format.as_deref()))),
      // Multi-typed schemas carry no single renderable shape.
      Some(SchemaTypeSet::Multiple(_)) => Ok(Synthesis::plain(TypeShape::Any)),
      None => {
        if !schema.properties.is_empty() || schema.additional_properties.is_some() {
          self.synthesize_object(schema, name_path, registry)
        } else if schema.items.is_some() {
          self.synthesize_array(schema, name_path, registry)
        } else {
          Ok(Synthesis::plain(TypeShape::Any))
        }
      }
    }
  }

  fn synthesize_array(
    &self,
    schema: &ObjectSchema,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    let Some(items) = schema.items.as_ref() else {
      return Ok(Synthesis::plain(TypeShape::Slice(Box::new(TypeShape::Any))));
    };

    let Schema::Object(items_ref) = items.as_ref() else {
      // `items: true` / `items: false` constrain nothing we can type.
      return Ok(Synthesis::plain(TypeShape::Slice(Box::new(TypeShape::Any))));
    };

    let mut path = name_path.to_vec();
    path.push("item".to_string());
    let item = self.synthesize_named(items_ref.as_ref(), &path, registry)?;

    Ok(Synthesis {
      shape: TypeShape::Slice(Box::new(item.shape)),
      aux_types: item.aux_types,
      has_additional_properties: false,
      additional_value: None,
    })
  }

  fn synthesize_object(
    &self,
    schema: &ObjectSchema,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    let mut aux_types = Vec::new();

    let additional_value = match schema.additional_properties.as_ref() {
      Some(Schema::Boolean(open)) if open.0 => Some(TypeShape::Any),
      Some(Schema::Object(value_ref)) => {
        let mut path = name_path.to_vec();
        path.push("additional".to_string());
        let value = self.synthesize_named(value_ref.as_ref(), &path, registry)?;
        aux_types.extend(value.aux_types);
        Some(value.shape)
      }
      // `additionalProperties: false` and absent both close the type.
      _ => None,
    };

    if schema.properties.is_empty() {
      // No fixed fields: the whole type is a string-keyed map. An entirely
      // unconstrained object maps to values of `Any`.
      let value = additional_value.clone().unwrap_or(TypeShape::Any);
      return Ok(Synthesis {
        shape: TypeShape::Map { value: Box::new(value) },
        aux_types,
        has_additional_properties: additional_value.is_some(),
        additional_value,
      });
    }

    let mut fields = Vec::new();
    let mut scope = NameScope::new();

    // BTreeMap iteration gives the sorted property order the output
    // contract requires.
    for (prop_name, prop_ref) in &schema.properties {
      let mut path = name_path.to_vec();
      path.push(prop_name.clone());
      let prop = self.synthesize_named(prop_ref, &path, registry)?;
      aux_types.extend(prop.aux_types);

      let description = match prop_ref {
        ObjectOrReference::Object(prop_schema) => prop_schema.description.clone(),
        ObjectOrReference::Ref { .. } => None,
      };

      fields.push(FieldShape {
        source_name: prop_name.clone(),
        field_name: scope.claim(to_field_name(prop_name)),
        shape: prop.shape,
        optional: !schema.required.contains(prop_name),
        description,
      });
    }

    Ok(Synthesis {
      shape: TypeShape::Struct { fields },
      aux_types,
      has_additional_properties: additional_value.is_some(),
      additional_value,
    })
  }

  /// Merges every `allOf` member into a single struct. Field collisions
  /// across members fail unless the colliding shapes are identical, in
  /// which case they unify (required wins over optional).
  fn merge_all_of(
    &self,
    schema: &ObjectSchema,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    let mut fields: Vec<FieldShape> = Vec::new();
    let mut aux_types = Vec::new();
    let mut has_additional_properties = false;
    let mut additional_value: Option<TypeShape> = None;

    for member in &schema.all_of {
      let member_syn = match member {
        ObjectOrReference::Object(inline) => self.synthesize_schema(inline, name_path, registry)?,
        ObjectOrReference::Ref { ref_path, .. } => {
          // Validate the reference (supported section, no ref-to-ref
          // cycles) before taking the body for merging.
          self.resolver.resolve(ref_path, name_path, registry)?;

          // Merging expands the referenced body in place, so a cyclic
          // composition would otherwise recurse without bound. Track which
          // names are mid-expansion and fail on a revisit.
          let target = ref_path.rsplit('/').next().unwrap_or(ref_path).to_string();
          if self.expanding.borrow().contains(&target) {
            let mut chain = self.expanding.borrow().clone();
            chain.push(target);
            return Err(GeneratorError::ReferenceCycle { chain });
          }

          let body = member
            .resolve(self.spec)
            .map_err(|_| GeneratorError::unresolvable(ref_path, name_path))?;

          self.expanding.borrow_mut().push(target);
          let result = self.synthesize_schema(&body, name_path, registry);
          self.expanding.borrow_mut().pop();
          result?
        }
      };
      aux_types.extend(member_syn.aux_types);

      if member_syn.has_additional_properties {
        has_additional_properties = true;
        if additional_value.is_none() {
          additional_value = member_syn.additional_value;
        }
      }

      match member_syn.shape {
        TypeShape::Struct { fields: member_fields } => {
          for incoming in member_fields {
            match fields.iter_mut().find(|f| f.source_name == incoming.source_name) {
              None => fields.push(incoming),
              Some(existing) if existing.shape == incoming.shape => {
                existing.optional = existing.optional && incoming.optional;
              }
              Some(_) => {
                return Err(GeneratorError::merge_conflict(&incoming.source_name, name_path));
              }
            }
          }
        }
        // A members-as-map schema contributes no fixed fields, only the
        // additional-properties permission captured above.
        TypeShape::Map { .. } | TypeShape::Any => {}
        _ => {
          return Err(GeneratorError::unsupported("allOf member without object shape", name_path));
        }
      }
    }

    Ok(Synthesis {
      shape: TypeShape::Struct { fields },
      aux_types,
      has_additional_properties,
      additional_value,
    })
  }

  fn union_of(
    &self,
    members: &[ObjectOrReference<ObjectSchema>],
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    let mut variants = Vec::new();
    let mut aux_types = Vec::new();
    let mut scope = NameScope::new();

    // Declared order is the user-visible contract for unions.
    for (index, member) in members.iter().enumerate() {
      match member {
        ObjectOrReference::Ref { ref_path, .. } => {
          let (name, _kind) = self.resolver.resolve(ref_path, name_path, registry)?;
          variants.push(UnionVariant {
            name: scope.claim(name.clone()),
            shape: TypeShape::Reference(name),
          });
        }
        ObjectOrReference::Object(member_schema) => {
          let mut path = name_path.to_vec();
          path.push(format!("variant_{index}"));
          let syn = self.synthesize_schema(member_schema, &path, registry)?;
          let syn = self.mint_anonymous(syn, &path, registry);
          aux_types.extend(syn.aux_types);
          variants.push(UnionVariant {
            name: scope.claim(variant_label(&syn.shape, index)),
            shape: syn.shape,
          });
        }
      }
    }

    Ok(Synthesis {
      shape: TypeShape::Union { variants },
      aux_types,
      has_additional_properties: false,
      additional_value: None,
    })
  }

  /// Synthesizes a nested node and mints a named auxiliary definition when
  /// the result is a shape that can only render as a named item.
  fn synthesize_named(
    &self,
    node: &ObjectOrReference<ObjectSchema>,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<Synthesis, GeneratorError> {
    let syn = self.synthesize(node, name_path, registry)?;
    Ok(self.mint_anonymous(syn, name_path, registry))
  }

  /// Replaces a shape that can only render as a named item (struct, enum,
  /// union) with a reference to a freshly minted definition. Shapes that
  /// render inline pass through untouched.
  pub fn mint_anonymous(&self, syn: Synthesis, name_path: &[String], registry: &mut NameRegistry) -> Synthesis {
    match syn.shape {
      TypeShape::Struct { .. } | TypeShape::Enum { .. } | TypeShape::Union { .. } => {
        let source_name = name_path.join("_");
        let generated_name = registry.type_name(&source_name);
        let mut aux_types = syn.aux_types;
        aux_types.push(TypeDefinition {
          source_name,
          generated_name: generated_name.clone(),
          shape: syn.shape,
          has_additional_properties: syn.has_additional_properties,
          additional_value: syn.additional_value,
          description: None,
        });
        Synthesis {
          shape: TypeShape::Reference(generated_name),
          aux_types,
          has_additional_properties: false,
          additional_value: None,
        }
      }
      _ => syn,
    }
  }
}

fn enum_of(values: &[serde_json::Value]) -> Synthesis {
  let mut scope = NameScope::new();
  let constants = values
    .iter()
    .map(|value| {
      let literal = match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
      };
      let name = scope.claim(to_type_name(&literal));
      EnumConstant { literal, name }
    })
    .collect();

  Synthesis::plain(TypeShape::Enum { constants })
}

fn primitive_shape(typ: SchemaType, format: Option<&str>) -> TypeShape {
  let primitive = match typ {
    SchemaType::String => match format {
      Some("date") => Primitive::Date,
      Some("date-time") => Primitive::DateTime,
      Some("uuid") => Primitive::Uuid,
      Some("binary") => Primitive::Binary,
      _ => Primitive::String,
    },
    SchemaType::Number => match format {
      Some("float") => Primitive::Float,
      _ => Primitive::Double,
    },
    SchemaType::Integer => match format {
      Some("int32") => Primitive::Int32,
      _ => Primitive::Int64,
    },
    SchemaType::Boolean => Primitive::Boolean,
    // Handled by the callers before reaching here.
    SchemaType::Array | SchemaType::Object | SchemaType::Null => return TypeShape::Any,
  };

  TypeShape::Primitive(primitive)
}

fn variant_label(shape: &TypeShape, index: usize) -> String {
  match shape {
    TypeShape::Reference(name) => name.clone(),
    TypeShape::Primitive(Primitive::String) => "String".to_string(),
    TypeShape::Primitive(Primitive::Boolean) => "Boolean".to_string(),
    TypeShape::Primitive(Primitive::Int32 | Primitive::Int64) => "Integer".to_string(),
    TypeShape::Primitive(Primitive::Float | Primitive::Double) => "Number".to_string(),
    TypeShape::Primitive(_) => "String".to_string(),
    TypeShape::Slice(_) => "Array".to_string(),
    TypeShape::Map { .. } => "Object".to_string(),
    _ => format!("Variant{index}"),
  }
}
