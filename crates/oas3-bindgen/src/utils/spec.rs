use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

/// Input format, decided by file extension; JSON when unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  fn from_path(path: &Path) -> Self {
    match path.extension().and_then(OsStr::to_str) {
      Some("yaml" | "yml") => Self::Yaml,
      _ => Self::Json,
    }
  }
}

/// Memory-mapped OpenAPI document loader.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    Ok(Self {
      file: AsyncMmapFile::open(path).await?,
      format: SpecFormat::from_path(path),
    })
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    let bytes = self.file.as_slice();
    match self.format {
      SpecFormat::Json => Ok(serde_json::from_slice::<oas3::Spec>(bytes)?),
      SpecFormat::Yaml => Ok(oas3::from_yaml(std::str::from_utf8(bytes)?)?),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_loads_json_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.json");
    std::fs::write(
      &path,
      r#"{ "openapi": "3.0.0", "info": { "title": "t", "version": "1" }, "paths": {} }"#,
    )
    .unwrap();

    let spec = SpecLoader::open(&path).await.unwrap().parse().unwrap();
    assert_eq!(spec.info.title, "t");
  }

  #[tokio::test]
  async fn test_loads_yaml_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.yaml");
    std::fs::write(&path, "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths: {}\n").unwrap();

    let spec = SpecLoader::open(&path).await.unwrap().parse().unwrap();
    assert_eq!(spec.info.version, "1");
  }
}
