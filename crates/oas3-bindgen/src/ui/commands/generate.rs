use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{GenerateOptions, GenerationStats, Generator},
  ui::{Colors, GenerateCommand, GenerateSection},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: Option<PathBuf>,
  pub options: GenerateOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> Self {
    let GenerateCommand {
      input,
      output,
      sections,
      exclude_schemas,
      verbose,
      quiet,
    } = command;

    let options = GenerateOptions {
      generate_types: sections.contains(&GenerateSection::Types),
      generate_client: sections.contains(&GenerateSection::Client),
      generate_server: sections.contains(&GenerateSection::Server),
      exclude_schemas: exclude_schemas.unwrap_or_default(),
    };

    Self {
      input,
      output,
      options,
      verbose,
      quiet,
    }
  }

  async fn load_spec(&self) -> anyhow::Result<oas3::Spec> {
    SpecLoader::open(&self.input).await?.parse()
  }

  async fn write_output(&self, code: &str) -> anyhow::Result<()> {
    match &self.output {
      Some(path) => {
        if let Some(parent) = path.parent() {
          tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, code).await?;
      }
      None => print!("{code}"),
    }
    Ok(())
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  /// Progress output is suppressed entirely when the generated source goes
  /// to stdout, so piped output stays clean.
  fn suppressed(&self) -> bool {
    self.config.quiet || self.config.output.is_none()
  }

  fn info(&self, message: &str) {
    if !self.suppressed() {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.suppressed() {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  /// Extra detail behind `--verbose`.
  fn detail(&self, message: &str) {
    if self.config.verbose {
      self.info(&message.with(self.colors.accent()).to_string());
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_document(&self, title: &str, version: &str) {
    self.detail(&format!("Document: {title} v{version}"));
    self.detail(&format!("Sections: {}", enabled_sections(&self.config.options)));
    if !self.config.options.exclude_schemas.is_empty() {
      self.detail(&format!("Excluded schemas: {}", self.config.options.exclude_schemas.join(", ")));
    }
  }

  fn log_generating(&self) {
    self.info(&"Generating Rust source...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    self.stat("Types generated:", stats.types_generated.to_string());
    self.stat("Operations converted:", stats.operations_converted.to_string());
  }

  fn log_writing(&self) {
    if let Some(path) = &self.config.output {
      self.info(
        &format!("Writing to: {}", path.display())
          .with(self.colors.primary())
          .to_string(),
      );
    }
  }

  fn log_success(&self) {
    if !self.suppressed() {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated Rust source".with(self.colors.success())
      );
    }
  }
}

fn enabled_sections(options: &GenerateOptions) -> String {
  let mut names = Vec::new();
  if options.generate_types {
    names.push("types");
  }
  if options.generate_client {
    names.push("client");
  }
  if options.generate_server {
    names.push("server");
  }
  names.join(", ")
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let spec = config.load_spec().await?;

  logger.log_generating();
  let generator = Generator::new(spec, config.options.clone());
  let (title, version) = generator.title_and_version();
  logger.log_document(&title, &version);
  let (code, stats) = generator.generate()?;

  logger.print_statistics(&stats);
  logger.log_writing();
  config.write_output(&code).await?;
  logger.log_success();

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::{GenerateCommand, GenerateSection};

  #[test]
  fn test_verbose_flag_reaches_config() {
    let command = GenerateCommand {
      input: "api.json".into(),
      output: None,
      sections: vec![GenerateSection::Types, GenerateSection::Client],
      exclude_schemas: None,
      verbose: true,
      quiet: false,
    };
    let config = GenerateConfig::from_command(command);
    assert!(config.verbose);
    assert_eq!(enabled_sections(&config.options), "types, client");
  }
}
