use std::{
  collections::{BTreeMap, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static RUST_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> =
  LazyLock::new(|| ["Self", "Box", "Option", "Result", "String", "Vec"].into_iter().collect());

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces invalid identifier characters with
/// underscores, collapses runs of underscores, and trims the ends.
fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts a source name into a `PascalCase` Rust type identifier.
///
/// Empty input becomes `Unnamed`, a leading digit gains a `T` prefix, and
/// reserved names (`Self`, `Vec`, ...) gain a `Type` suffix so the output is
/// never a name the generated code cannot declare.
pub fn to_type_name(name: &str) -> String {
  let mut ident = sanitize(name).to_pascal_case();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }

  if RESERVED_TYPE_NAMES.contains(ident.as_str()) {
    ident.push_str("Type");
  }

  ident
}

/// Converts a source name into a `snake_case` Rust field identifier.
///
/// Empty input becomes `_`, a leading digit gains a `_` prefix, and
/// keywords gain a trailing underscore (`type` -> `type_`).
pub fn to_field_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  if RUST_KEYWORDS.contains(ident.as_str()) {
    ident.push('_');
  }

  ident
}

/// Converts a source name into a `SCREAMING_SNAKE_CASE` constant identifier.
pub fn to_constant_name(name: &str) -> String {
  let mut ident = sanitize(name).to_constant_case();

  if ident.is_empty() {
    return "UNNAMED".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}

/// Per-run table of generated type names.
///
/// All type naming flows through here so that two distinct source names can
/// never map to the same identifier within one generation run. When two
/// sources sanitize to the same identifier, the one claimed first keeps the
/// bare name and later ones get numeric suffixes; callers claim in sorted
/// source-name order, which makes the suffix assignment reproducible.
#[derive(Debug, Default)]
pub struct NameRegistry {
  by_ident: BTreeMap<String, String>,
  by_source: BTreeMap<String, String>,
}

impl NameRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the unique generated type name for `source`, minting it on
  /// first use. Repeated claims for the same source return the same name.
  pub fn type_name(&mut self, source: &str) -> String {
    if let Some(existing) = self.by_source.get(source) {
      return existing.clone();
    }

    let base = to_type_name(source);
    let mut candidate = base.clone();
    let mut counter = 2usize;
    while self.by_ident.contains_key(&candidate) {
      candidate = format!("{base}{counter}");
      counter += 1;
    }

    self.by_ident.insert(candidate.clone(), source.to_string());
    self.by_source.insert(source.to_string(), candidate.clone());
    candidate
  }

  /// Whether an identifier has already been handed out.
  pub fn is_taken(&self, ident: &str) -> bool {
    self.by_ident.contains_key(ident)
  }
}

/// Collision table for one naming scope (the fields of one struct, the
/// constants of one enum). Same suffix policy as [`NameRegistry`], but
/// scoped and throwaway.
#[derive(Debug, Default)]
pub struct NameScope {
  used: BTreeMap<String, ()>,
}

impl NameScope {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn claim(&mut self, ident: String) -> String {
    if self.used.insert(ident.clone(), ()).is_none() {
      return ident;
    }

    let mut counter = 2usize;
    loop {
      let candidate = format!("{ident}{counter}");
      if self.used.insert(candidate.clone(), ()).is_none() {
        return candidate;
      }
      counter += 1;
    }
  }
}
