//! Reference resolution.
//!
//! A `$ref` never gets inline-expanded into its referrer. Resolution maps
//! the reference string to the canonical generated type name and stops;
//! the referenced definition is synthesized where it is declared. That is
//! what keeps cyclic schema graphs from recursing forever.

use oas3::{Spec, spec::ObjectOrReference};

use super::{errors::GeneratorError, naming::NameRegistry};

const COMPONENTS_PREFIX: &str = "#/components/";

/// Supported component sections for intra-document references.
const SECTIONS: [&str; 4] = ["schemas", "parameters", "responses", "requestBodies"];

/// How a reference resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
  /// Points directly at a named component; reuse its generated type.
  Component,
  /// A ref-to-ref chain; the name is that of the ultimate target.
  Alias,
}

pub struct ReferenceResolver<'a> {
  spec: &'a Spec,
}

impl<'a> ReferenceResolver<'a> {
  pub fn new(spec: &'a Spec) -> Self {
    Self { spec }
  }

  /// Resolves `ref_path` to the generated type name of its ultimate target.
  ///
  /// Only intra-document `#/components/{schemas,parameters,responses,requestBodies}`
  /// references are supported; remote and URL references fail loudly rather
  /// than producing a best-guess name. Ref-to-ref chains are followed to the
  /// end, and a chain that revisits a name fails with a cycle error.
  pub fn resolve(
    &self,
    ref_path: &str,
    name_path: &[String],
    registry: &mut NameRegistry,
  ) -> Result<(String, ResolutionKind), GeneratorError> {
    let Some((section, name)) = split_ref(ref_path) else {
      return Err(GeneratorError::unresolvable(ref_path, name_path));
    };

    let mut chain = vec![name.to_string()];
    let mut current_section = section.to_string();
    let mut current_name = name.to_string();

    loop {
      match self.entry_ref(&current_section, &current_name) {
        // The name does not exist in the document.
        None => return Err(GeneratorError::unresolvable(ref_path, name_path)),
        // Concrete entry; the chain ends here.
        Some(None) => break,
        // The entry is itself a reference; keep walking.
        Some(Some(next_ref)) => {
          let Some((next_section, next_name)) = split_ref(&next_ref) else {
            return Err(GeneratorError::unresolvable(&next_ref, name_path));
          };
          if chain.iter().any(|seen| seen == next_name) {
            chain.push(next_name.to_string());
            return Err(GeneratorError::ReferenceCycle { chain });
          }
          chain.push(next_name.to_string());
          current_section = next_section.to_string();
          current_name = next_name.to_string();
        }
      }
    }

    let kind = if chain.len() == 1 {
      ResolutionKind::Component
    } else {
      ResolutionKind::Alias
    };

    let target = chain.last().map(String::as_str).unwrap_or(name);
    Ok((registry.type_name(target), kind))
  }

  /// Looks up `name` in `section`. Returns `None` when the entry is absent,
  /// `Some(None)` when it is a concrete object, and `Some(Some(ref_path))`
  /// when the entry is itself a reference to follow.
  fn entry_ref(&self, section: &str, name: &str) -> Option<Option<String>> {
    let components = self.spec.components.as_ref()?;

    fn probe<T>(entry: Option<&ObjectOrReference<T>>) -> Option<Option<String>> {
      entry.map(|e| match e {
        ObjectOrReference::Ref { ref_path, .. } => Some(ref_path.clone()),
        ObjectOrReference::Object(_) => None,
      })
    }

    match section {
      "schemas" => probe(components.schemas.get(name)),
      "parameters" => probe(components.parameters.get(name)),
      "responses" => probe(components.responses.get(name)),
      "requestBodies" => probe(components.request_bodies.get(name)),
      _ => None,
    }
  }
}

/// Splits a supported reference path into (section, component name).
fn split_ref(ref_path: &str) -> Option<(&str, &str)> {
  let rest = ref_path.strip_prefix(COMPONENTS_PREFIX)?;
  let (section, name) = rest.split_once('/')?;
  if !SECTIONS.contains(&section) || name.is_empty() || name.contains('/') {
    return None;
  }
  Some((section, name))
}
