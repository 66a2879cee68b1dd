//! The OpenAPI to Rust generation pipeline.
//!
//! [`Generator`] wires the stages together: collect the component sections
//! into type definitions, extract operations, fold operation-owned types into
//! the global list, render the requested sections, and format the result.
//! Every stage is deterministic, so one document with one set of options
//! always produces byte-identical output.

pub(crate) mod collector;
pub(crate) mod errors;
pub(crate) mod format;
pub(crate) mod model;
pub(crate) mod naming;
pub(crate) mod operations;
pub(crate) mod refs;
pub(crate) mod render;
pub(crate) mod synthesizer;

#[cfg(test)]
mod tests;

pub use errors::GeneratorError;
pub use model::GenerateOptions;

use self::{
  collector::TypeCollector, model::OperationDefinition, naming::NameRegistry, operations::OperationExtractor,
  render::Renderer,
};

/// Statistics reported after a generation run.
#[derive(Debug)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub operations_converted: usize,
}

pub struct Generator {
  spec: oas3::Spec,
  options: GenerateOptions,
}

impl Generator {
  pub fn new(spec: oas3::Spec, options: GenerateOptions) -> Self {
    Self { spec, options }
  }

  /// Metadata from the document's `info` object, for headers and listings.
  pub fn title_and_version(&self) -> (String, String) {
    (self.spec.info.title.clone(), self.spec.info.version.clone())
  }

  /// Runs the full pipeline and returns formatted Rust source.
  pub fn generate(&self) -> Result<(String, GenerationStats), GeneratorError> {
    // Fresh registry per run: name collision suffixes must depend only on
    // this document, never on earlier runs.
    let mut registry = NameRegistry::new();

    let component_types =
      TypeCollector::new(&self.spec).collect(&self.options.exclude_schemas, &mut registry)?;
    let operations = OperationExtractor::new(&self.spec).extract(&mut registry)?;
    let collected = TypeCollector::finalize(component_types, &operations);

    let stats = GenerationStats {
      types_generated: collected.types.len(),
      operations_converted: operations.len(),
    };

    let raw = Renderer::new()?.render(&collected, &operations, &self.options, &mut registry)?;
    let formatted = format::format_source(&raw)?;

    Ok((formatted, stats))
  }

  /// Extracts operations alone, for listings that never render code.
  pub fn operations(&self) -> Result<Vec<OperationDefinition>, GeneratorError> {
    let mut registry = NameRegistry::new();
    TypeCollector::new(&self.spec).collect(&[], &mut registry)?;
    OperationExtractor::new(&self.spec).extract(&mut registry)
  }
}
