//! Output formatting.
//!
//! The concatenated template output is parsed as a full Rust source file and
//! pretty-printed. A parse failure echoes the raw, unformatted text to
//! stderr before surfacing the error, so a broken template is debuggable
//! from the output it actually produced.

use super::errors::GeneratorError;

pub fn format_source(raw: &str) -> Result<String, GeneratorError> {
  match syn::parse_file(raw) {
    Ok(file) => Ok(prettyplease::unparse(&file)),
    Err(source) => {
      eprintln!("{raw}");
      Err(GeneratorError::FormatterSyntax { source })
    }
  }
}
