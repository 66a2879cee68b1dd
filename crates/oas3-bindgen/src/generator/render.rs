//! Source rendering.
//!
//! The templates are deliberately dumb: every Rust expression they print is
//! pre-rendered here into serializable view structs, so template logic never
//! grows its own opinion about the output language. Sections render in a
//! fixed order (header, constants, types, additional-properties glue,
//! client, client-with-responses, server) and concatenate into one source
//! file that the formatter then normalizes.

use serde::Serialize;
use tera::Tera;

use super::{
  errors::GeneratorError,
  model::{
    CollectedTypes, GenerateOptions, OperationDefinition, ParameterDefinition, ParameterLocation, Primitive,
    TypeDefinition, TypeShape,
  },
  naming::{NameRegistry, to_constant_name, to_field_name},
  operations::security_provider_names,
};

const HEADER_TEMPLATE: &str = include_str!("templates/header.tera");
const CONSTANTS_TEMPLATE: &str = include_str!("templates/constants.tera");
const TYPEDEF_TEMPLATE: &str = include_str!("templates/typedef.tera");
const ADDITIONAL_PROPERTIES_TEMPLATE: &str = include_str!("templates/additional_properties.tera");
const CLIENT_TEMPLATE: &str = include_str!("templates/client.tera");
const CLIENT_WITH_RESPONSES_TEMPLATE: &str = include_str!("templates/client_with_responses.tera");
const SERVER_TEMPLATE: &str = include_str!("templates/server.tera");

/// The Rust type expression a shape renders to in a field or argument
/// position. Anonymous compound shapes have already been minted into named
/// definitions by the synthesizer; any that remain degrade to a JSON value.
pub fn type_text(shape: &TypeShape) -> String {
  match shape {
    TypeShape::Primitive(primitive) => primitive.rust_type().to_string(),
    TypeShape::Reference(name) => name.clone(),
    TypeShape::Slice(inner) => format!("Vec<{}>", type_text(inner)),
    TypeShape::Map { value } => format!("std::collections::HashMap<String, {}>", type_text(value)),
    TypeShape::Any | TypeShape::Struct { .. } | TypeShape::Enum { .. } | TypeShape::Union { .. } => {
      "serde_json::Value".to_string()
    }
  }
}

pub struct Renderer {
  tera: Tera,
}

impl Renderer {
  pub fn new() -> Result<Self, GeneratorError> {
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());

    for (section, template) in [
      ("header", HEADER_TEMPLATE),
      ("constants", CONSTANTS_TEMPLATE),
      ("typedef", TYPEDEF_TEMPLATE),
      ("additional_properties", ADDITIONAL_PROPERTIES_TEMPLATE),
      ("client", CLIENT_TEMPLATE),
      ("client_with_responses", CLIENT_WITH_RESPONSES_TEMPLATE),
      ("server", SERVER_TEMPLATE),
    ] {
      tera
        .add_raw_template(section, template)
        .map_err(|source| GeneratorError::TemplateExecution {
          section: "register",
          source: Box::new(source),
        })?;
    }

    Ok(Self { tera })
  }

  /// Renders the requested sections into one unformatted source string.
  ///
  /// `registry` is still live here so the with-responses wrapper can claim
  /// its `{Operation}Response` names through the same collision table the
  /// schema types used.
  pub fn render(
    &self,
    collected: &CollectedTypes,
    operations: &[OperationDefinition],
    options: &GenerateOptions,
    registry: &mut NameRegistry,
  ) -> Result<String, GeneratorError> {
    let mut output = String::new();

    output.push_str(&self.render_section("header", &tera::Context::new())?);

    if options.generate_types {
      let providers: Vec<ConstantView> = security_provider_names(operations)
        .into_iter()
        .map(|name| ConstantView {
          const_name: format!("{}_SCOPES", to_constant_name(&name)),
          value: format!("{name}.Scopes"),
        })
        .collect();
      if !providers.is_empty() {
        let mut context = tera::Context::new();
        context.insert("providers", &providers);
        output.push_str(&self.render_section("constants", &context)?);
      }

      let types: Vec<TypeView> = collected.types.iter().map(type_view).collect();
      let mut context = tera::Context::new();
      context.insert("types", &types);
      output.push_str(&self.render_section("typedef", &context)?);

      let glue: Vec<TypeView> = collected
        .additional_property_types
        .iter()
        .filter(|def| matches!(def.shape, TypeShape::Struct { .. }))
        .map(type_view)
        .collect();
      if !glue.is_empty() {
        let mut context = tera::Context::new();
        context.insert("types", &glue);
        output.push_str(&self.render_section("additional_properties", &context)?);
      }
    }

    if options.generate_client {
      let views: Vec<ClientOperationView> = operations.iter().map(|op| client_view(op, registry)).collect();
      let mut context = tera::Context::new();
      context.insert("operations", &views);
      output.push_str(&self.render_section("client", &context)?);
      output.push_str(&self.render_section("client_with_responses", &context)?);
    }

    if options.generate_server {
      let views: Vec<ServerOperationView> = operations.iter().map(server_view).collect();
      let mut context = tera::Context::new();
      context.insert("operations", &views);
      output.push_str(&self.render_section("server", &context)?);
    }

    Ok(output)
  }

  fn render_section(&self, section: &'static str, context: &tera::Context) -> Result<String, GeneratorError> {
    self
      .tera
      .render(section, context)
      .map_err(|source| GeneratorError::TemplateExecution {
        section,
        source: Box::new(source),
      })
  }
}

#[derive(Debug, Serialize)]
struct ConstantView {
  const_name: String,
  value: String,
}

#[derive(Debug, Serialize)]
struct FieldView {
  name: String,
  source_name: String,
  typ: String,
  optional: bool,
  needs_rename: bool,
  doc_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EnumConstantView {
  name: String,
  literal: String,
}

#[derive(Debug, Serialize)]
struct VariantView {
  name: String,
  typ: String,
}

#[derive(Debug, Serialize)]
struct TypeView {
  kind: &'static str,
  name: String,
  doc_lines: Vec<String>,
  alias_target: String,
  fields: Vec<FieldView>,
  constants: Vec<EnumConstantView>,
  variants: Vec<VariantView>,
  has_additional_properties: bool,
  additional_type: String,
}

#[derive(Debug, Serialize)]
struct ClientOperationView {
  fn_name: String,
  doc_lines: Vec<String>,
  args: String,
  body_lines: Vec<String>,
  response_name: String,
  response_fields: Vec<FieldView>,
  wrapper_body_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ServerOperationView {
  fn_name: String,
  handler_name: String,
  trait_args: String,
  handler_args: Vec<String>,
  forward_args: String,
  axum_path: String,
  routing_method: String,
}

fn doc_lines(text: Option<&str>) -> Vec<String> {
  text
    .map(|t| t.lines().map(|line| line.trim_end().to_string()).collect())
    .unwrap_or_default()
}

fn type_view(def: &TypeDefinition) -> TypeView {
  let additional_type = def.additional_value.as_ref().map(type_text).unwrap_or_default();

  let mut view = TypeView {
    kind: "alias",
    name: def.generated_name.clone(),
    doc_lines: doc_lines(def.description.as_deref()),
    alias_target: String::new(),
    fields: Vec::new(),
    constants: Vec::new(),
    variants: Vec::new(),
    has_additional_properties: def.has_additional_properties,
    additional_type,
  };

  match &def.shape {
    TypeShape::Struct { fields } => {
      view.kind = "struct";
      view.fields = fields
        .iter()
        .map(|field| FieldView {
          needs_rename: field.field_name != field.source_name,
          name: field.field_name.clone(),
          source_name: field.source_name.clone(),
          typ: type_text(&field.shape),
          optional: field.optional,
          doc_lines: doc_lines(field.description.as_deref()),
        })
        .collect();
    }
    TypeShape::Enum { constants } => {
      view.kind = "enum";
      view.constants = constants
        .iter()
        .map(|constant| EnumConstantView {
          name: constant.name.clone(),
          literal: constant.literal.clone(),
        })
        .collect();
    }
    TypeShape::Union { variants } => {
      view.kind = "union";
      view.variants = variants
        .iter()
        .map(|variant| VariantView {
          name: variant.name.clone(),
          typ: type_text(&variant.shape),
        })
        .collect();
    }
    other => {
      view.alias_target = type_text(other);
    }
  }

  view
}

/// The params-struct definition an operation minted, if any.
fn params_struct_name(op: &OperationDefinition) -> Option<String> {
  let source = format!("{}_params", op.operation_id);
  op.type_definitions
    .iter()
    .find(|def| def.source_name == source)
    .map(|def| def.generated_name.clone())
}

/// Path parameter argument types: strings borrow, everything else passes by
/// value.
fn path_arg_type(shape: &TypeShape) -> String {
  match shape {
    TypeShape::Primitive(Primitive::String) => "&str".to_string(),
    other => type_text(other),
  }
}

/// Rewrites `/pets/{petId}` into `/pets/{pet_id}`, so the same text works
/// both as a `format!` string over local bindings and as a router path.
fn rewrite_path(path: &str) -> String {
  let mut out = String::new();
  for segment in path.split('/').skip(1) {
    out.push('/');
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(name) => {
        out.push('{');
        out.push_str(&to_field_name(name));
        out.push('}');
      }
      None => out.push_str(segment),
    }
  }
  if out.is_empty() { "/".to_string() } else { out }
}

fn path_params(op: &OperationDefinition) -> Vec<&ParameterDefinition> {
  op.parameters
    .iter()
    .filter(|p| p.location == ParameterLocation::Path)
    .collect()
}

/// An expression turning a parameter value into its query/header string.
/// Display-able primitives stringify directly; compound shapes go through
/// JSON.
fn stringify_expr(shape: &TypeShape, value: &str) -> String {
  match shape {
    TypeShape::Primitive(Primitive::Binary) => format!("serde_json::to_string(&{value}).unwrap_or_default()"),
    TypeShape::Primitive(_) | TypeShape::Any => format!("{value}.to_string()"),
    _ => format!("serde_json::to_string(&{value}).unwrap_or_default()"),
  }
}

fn client_view(op: &OperationDefinition, registry: &mut NameRegistry) -> ClientOperationView {
  let fn_name = to_field_name(&op.operation_id);
  let params_name = params_struct_name(op);

  let mut args = String::new();
  let mut forward_args: Vec<String> = Vec::new();
  for param in path_params(op) {
    args.push_str(&format!(", {}: {}", param.field_name, path_arg_type(&param.shape)));
    forward_args.push(param.field_name.clone());
  }
  if let Some(name) = params_name.as_deref() {
    args.push_str(&format!(", params: &{name}"));
    forward_args.push("params".to_string());
  }
  if let Some(body) = op.request_body.as_ref() {
    args.push_str(&format!(", body: &{}", type_text(&body.shape)));
    forward_args.push("body".to_string());
  }

  let mut body_lines = Vec::new();
  body_lines.push(format!(
    "let url = format!(\"{{}}{}\", self.base_url);",
    rewrite_path(&op.path)
  ));

  let request_expr = match op.method.as_str() {
    "GET" => "self.http.get(&url)".to_string(),
    "POST" => "self.http.post(&url)".to_string(),
    "PUT" => "self.http.put(&url)".to_string(),
    "DELETE" => "self.http.delete(&url)".to_string(),
    "PATCH" => "self.http.patch(&url)".to_string(),
    "HEAD" => "self.http.head(&url)".to_string(),
    other => format!("self.http.request(reqwest::Method::{other}, &url)"),
  };
  body_lines.push(format!("let mut request = {request_expr};"));

  for param in &op.parameters {
    let line = match param.location {
      ParameterLocation::Path | ParameterLocation::Cookie => continue,
      ParameterLocation::Query => {
        if param.required {
          format!(
            "request = request.query(&[(\"{}\", {})]);",
            param.source_name,
            stringify_expr(&param.shape, &format!("params.{}", param.field_name)),
          )
        } else {
          format!(
            "if let Some(value) = params.{}.as_ref() {{ request = request.query(&[(\"{}\", {})]); }}",
            param.field_name,
            param.source_name,
            stringify_expr(&param.shape, "value"),
          )
        }
      }
      ParameterLocation::Header => {
        if param.required {
          format!(
            "request = request.header(\"{}\", {});",
            param.source_name,
            stringify_expr(&param.shape, &format!("params.{}", param.field_name)),
          )
        } else {
          format!(
            "if let Some(value) = params.{}.as_ref() {{ request = request.header(\"{}\", {}); }}",
            param.field_name,
            param.source_name,
            stringify_expr(&param.shape, "value"),
          )
        }
      }
    };
    body_lines.push(line);
  }

  if op.request_body.is_some() {
    body_lines.push("request = request.json(body);".to_string());
  }
  body_lines.push("request.send().await".to_string());

  let response_name = registry.type_name(&format!("{}_response", op.operation_id));

  let mut response_fields = Vec::new();
  let mut init_fields = vec!["status".to_string()];
  let mut arms = Vec::new();
  for response in &op.responses {
    let Some(shape) = response.shape.as_ref() else {
      continue;
    };
    let field = format!("json_{}", response.status.to_lowercase());
    response_fields.push(FieldView {
      name: field.clone(),
      source_name: response.status.clone(),
      typ: type_text(shape),
      optional: true,
      needs_rename: false,
      doc_lines: Vec::new(),
    });
    init_fields.push(format!("{field}: None"));

    if response.status.chars().all(|c| c.is_ascii_digit()) {
      arms.push(format!(
        "{} => parsed.{field} = response.json().await.ok(),",
        response.status
      ));
    } else if let Some(class) = response.status.strip_suffix("XX").and_then(|d| d.parse::<u16>().ok()) {
      arms.push(format!(
        "s if ({}..={}).contains(&s) => parsed.{field} = response.json().await.ok(),",
        class * 100,
        class * 100 + 99
      ));
    } else if response.status == "default" {
      // Emitted below as the wildcard arm so it stays last.
    }
  }
  let default_field = op
    .responses
    .iter()
    .find(|r| r.status == "default" && r.shape.is_some())
    .map(|_| "json_default".to_string());
  match default_field {
    Some(field) => arms.push(format!("_ => parsed.{field} = response.json().await.ok(),")),
    None => arms.push("_ => {}".to_string()),
  }

  let mut wrapper_body_lines = Vec::new();
  wrapper_body_lines.push(format!(
    "let response = self.client.{fn_name}({}).await?;",
    forward_args.join(", ")
  ));
  wrapper_body_lines.push("let status = response.status();".to_string());
  if response_fields.is_empty() {
    wrapper_body_lines.push(format!("let parsed = {response_name} {{ status }};"));
  } else {
    wrapper_body_lines.push(format!(
      "let mut parsed = {response_name} {{ {} }};",
      init_fields.join(", ")
    ));
    wrapper_body_lines.push("match status.as_u16() {".to_string());
    wrapper_body_lines.extend(arms);
    wrapper_body_lines.push("}".to_string());
  }
  wrapper_body_lines.push("Ok(parsed)".to_string());

  ClientOperationView {
    fn_name,
    doc_lines: doc_lines(op.summary.as_deref().or(op.description.as_deref())),
    args,
    body_lines,
    response_name,
    response_fields,
    wrapper_body_lines,
  }
}

fn server_view(op: &OperationDefinition) -> ServerOperationView {
  let fn_name = to_field_name(&op.operation_id);
  let params_name = params_struct_name(op);
  let path_params = path_params(op);

  let mut trait_args = String::new();
  let mut forward_args: Vec<String> = Vec::new();
  let mut handler_args = vec!["axum::extract::State(api): axum::extract::State<std::sync::Arc<A>>".to_string()];

  match path_params.as_slice() {
    [] => {}
    [only] => {
      handler_args.push(format!(
        "axum::extract::Path({}): axum::extract::Path<{}>",
        only.field_name,
        type_text(&only.shape)
      ));
    }
    many => {
      let names: Vec<&str> = many.iter().map(|p| p.field_name.as_str()).collect();
      let types: Vec<String> = many.iter().map(|p| type_text(&p.shape)).collect();
      handler_args.push(format!(
        "axum::extract::Path(({})): axum::extract::Path<({})>",
        names.join(", "),
        types.join(", ")
      ));
    }
  }
  for param in &path_params {
    trait_args.push_str(&format!(", {}: {}", param.field_name, type_text(&param.shape)));
    forward_args.push(param.field_name.clone());
  }

  if let Some(name) = params_name.as_deref() {
    trait_args.push_str(&format!(", params: {name}"));
    forward_args.push("params".to_string());
    handler_args.push(format!(
      "axum::extract::Query(params): axum::extract::Query<{name}>"
    ));
  }

  if let Some(body) = op.request_body.as_ref() {
    let typ = type_text(&body.shape);
    trait_args.push_str(&format!(", body: {typ}"));
    forward_args.push("body".to_string());
    // Body extractor stays last; it consumes the request.
    handler_args.push(format!("axum::extract::Json(body): axum::extract::Json<{typ}>"));
  }

  ServerOperationView {
    handler_name: format!("handle_{fn_name}"),
    fn_name,
    trait_args,
    handler_args,
    forward_args: forward_args.join(", "),
    axum_path: rewrite_path(&op.path),
    routing_method: op.method.as_str().to_lowercase(),
  }
}
