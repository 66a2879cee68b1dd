use thiserror::Error;

/// Failures raised while turning an OpenAPI document into Rust source.
///
/// Synthesis and extraction errors carry the document location that caused
/// them (a `/`-joined name path such as `Pet/tags/items`) so a failure is
/// attributable without re-running under a debugger. Nothing is recovered
/// locally; the first error aborts the whole generation run.
#[derive(Debug, Error)]
pub enum GeneratorError {
  /// A `$ref` pointing outside the supported component sections, or to a
  /// name that does not exist in the document.
  #[error("unresolvable reference `{ref_path}` at `{location}`")]
  UnresolvableReference { ref_path: String, location: String },

  /// A `$ref` chain that comes back to a name it already visited.
  #[error("reference cycle: {}", chain.join(" -> "))]
  ReferenceCycle { chain: Vec<String> },

  /// Two `allOf` members declare the same field with different shapes.
  #[error("allOf members of `{location}` both declare field `{field}` with different shapes")]
  SchemaMergeConflict { field: String, location: String },

  /// A schema construct the generator has no mapping for.
  #[error("unsupported schema construct `{construct}` at `{location}`")]
  UnsupportedSchemaConstruct { construct: String, location: String },

  /// The template engine failed while rendering one logical section.
  #[error("template for section `{section}` failed to render")]
  TemplateExecution {
    section: &'static str,
    #[source]
    source: Box<tera::Error>,
  },

  /// The concatenated output is not syntactically valid Rust. The pipeline
  /// echoes the unformatted text to stderr before surfacing this.
  #[error("generated source failed to parse")]
  FormatterSyntax {
    #[source]
    source: syn::Error,
  },
}

impl GeneratorError {
  pub(crate) fn unresolvable(ref_path: &str, name_path: &[String]) -> Self {
    Self::UnresolvableReference {
      ref_path: ref_path.to_string(),
      location: name_path.join("/"),
    }
  }

  pub(crate) fn merge_conflict(field: &str, name_path: &[String]) -> Self {
    Self::SchemaMergeConflict {
      field: field.to_string(),
      location: name_path.join("/"),
    }
  }

  pub(crate) fn unsupported(construct: &str, name_path: &[String]) -> Self {
    Self::UnsupportedSchemaConstruct {
      construct: construct.to_string(),
      location: name_path.join("/"),
    }
  }
}
