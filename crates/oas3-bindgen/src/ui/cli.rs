use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-bindgen")]
#[command(author, version, about = "OpenAPI to Rust source generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate Rust source from an OpenAPI document
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the OpenAPI document (JSON, or YAML by file extension)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Path for the generated Rust source; stdout when omitted
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Sections to generate
  #[arg(
    long = "generate",
    value_enum,
    value_delimiter = ',',
    value_name = "SECTIONS",
    default_values_t = [GenerateSection::Types, GenerateSection::Client, GenerateSection::Server]
  )]
  pub sections: Vec<GenerateSection>,

  /// Component schemas to skip, so externally defined types can stand in
  /// under the same names
  #[arg(long, value_name = "NAMES", value_delimiter = ',')]
  pub exclude_schemas: Option<Vec<String>>,

  /// Enable verbose output
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateSection {
  Types,
  Client,
  Server,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in the OpenAPI document
  Operations {
    /// Path to the OpenAPI document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
