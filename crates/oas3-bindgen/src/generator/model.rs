//! The renderable output model.
//!
//! Everything the templates consume is built from these types. Shapes
//! reference other type definitions by generated name instead of embedding
//! them, which is what keeps recursive and mutually-referential schemas
//! finite: a struct field naming a not-yet-rendered type is always valid.

use http::Method;

/// Scalar types a schema primitive can map to, refined by `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
  String,
  Date,
  DateTime,
  Uuid,
  Binary,
  Float,
  Double,
  Int32,
  Int64,
  Boolean,
}

impl Primitive {
  /// The Rust type the primitive renders to in generated code.
  pub fn rust_type(self) -> &'static str {
    match self {
      Self::String => "String",
      Self::Date => "chrono::NaiveDate",
      Self::DateTime => "chrono::DateTime<chrono::Utc>",
      Self::Uuid => "uuid::Uuid",
      Self::Binary => "Vec<u8>",
      Self::Float => "f32",
      Self::Double => "f64",
      Self::Int32 => "i32",
      Self::Int64 => "i64",
      Self::Boolean => "bool",
    }
  }
}

/// The resolved, renderable shape of a type definition.
///
/// A closed set: the rendering layer matches exhaustively on the tag, so a
/// new shape is a deliberate, compiler-checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
  Primitive(Primitive),
  Struct { fields: Vec<FieldShape> },
  Slice(Box<TypeShape>),
  Enum { constants: Vec<EnumConstant> },
  Union { variants: Vec<UnionVariant> },
  Map { value: Box<TypeShape> },
  /// A by-name link to another [`TypeDefinition`].
  Reference(String),
  /// A schema with no usable constraints (`{}`, `type: null`, mixed types).
  Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
  /// Property name as written in the document.
  pub source_name: String,
  /// Sanitized Rust field identifier.
  pub field_name: String,
  pub shape: TypeShape,
  /// Absent-vs-present is significant; optional fields render as `Option<T>`.
  pub optional: bool,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
  /// The literal as it appears on the wire.
  pub literal: String,
  /// Sanitized variant identifier.
  pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
  pub name: String,
  pub shape: TypeShape,
}

/// One named, renderable type in the synthesized output model.
///
/// Created once during collection, immutable afterwards. `generated_name`
/// is unique within a generation run (see `NameRegistry`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
  pub source_name: String,
  pub generated_name: String,
  pub shape: TypeShape,
  /// The schema permits undeclared properties; the additional-properties
  /// glue generator runs only over definitions carrying this flag.
  pub has_additional_properties: bool,
  /// Value shape for undeclared properties (`Any` when unconstrained).
  pub additional_value: Option<TypeShape>,
  pub description: Option<String>,
}

/// Everything the collector produces for one run.
#[derive(Debug, Default)]
pub struct CollectedTypes {
  /// Ordered, de-duplicated list of all type definitions.
  pub types: Vec<TypeDefinition>,
  /// Definitions flagged `has_additional_properties`, in `types` order.
  pub additional_property_types: Vec<TypeDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
}

impl ParameterLocation {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Path => "path",
      Self::Query => "query",
      Self::Header => "header",
      Self::Cookie => "cookie",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
  pub source_name: String,
  pub field_name: String,
  pub location: ParameterLocation,
  pub shape: TypeShape,
  pub required: bool,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyDefinition {
  pub shape: TypeShape,
  pub required: bool,
}

/// One declared response status. `shape` is `None` for non-JSON bodies,
/// which are deliberately left untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDefinition {
  pub status: String,
  pub shape: Option<TypeShape>,
}

/// Back-reference from an operation to a named security scheme. Many
/// operations may name the same scheme; constants are emitted from the
/// deduplicated provider-name set.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityDefinition {
  pub provider_name: String,
  pub scopes: Vec<String>,
}

/// The structured description of one API operation, used to drive client
/// and server code generation.
#[derive(Debug, Clone)]
pub struct OperationDefinition {
  /// Explicit `operationId`, or a deterministic synthesis from method+path.
  pub operation_id: String,
  /// Unique PascalCase base for the operation's generated type names.
  pub generated_name: String,
  pub path: String,
  pub method: Method,
  pub parameters: Vec<ParameterDefinition>,
  pub request_body: Option<BodyDefinition>,
  pub responses: Vec<ResponseDefinition>,
  pub security_definitions: Vec<SecurityDefinition>,
  /// Types minted for this operation (params struct, inline bodies); the
  /// collector folds these into the global type list.
  pub type_definitions: Vec<TypeDefinition>,
  pub summary: Option<String>,
  pub description: Option<String>,
}

/// The optional code to generate.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
  pub generate_types: bool,
  pub generate_client: bool,
  pub generate_server: bool,
  /// Component schema names to skip, so a caller can substitute an
  /// externally defined type under the same name.
  pub exclude_schemas: Vec<String>,
}
