//! Loads a content directory of JSON arrays, one file per content kind.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use folio_core::snapshot::{ContentSource, RawSnapshot, records};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
  #[error("failed to read {}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error("failed to parse {}: {source}", .path.display())]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("{}: {source}", .path.display())]
  Shape {
    path:   PathBuf,
    source: folio_core::Error,
  },
}

/// A directory containing any of `personas.json`, `skills.json`,
/// `articles.json`, `collections.json`, `items.json` and `resume.json`.
/// Missing files load as empty collections.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
  dir:  PathBuf,
  name: String,
}

impl JsonDirSource {
  pub fn new(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref().to_path_buf();
    Self {
      name: dir.display().to_string(),
      dir,
    }
  }

  fn read(&self, file: &'static str) -> Result<Vec<Value>, SourceError> {
    let path = self.dir.join(file);
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no file, treating as empty");
        return Ok(Vec::new());
      }
      Err(source) => return Err(SourceError::Io { path, source }),
    };

    let value: Value = serde_json::from_str(&raw).map_err(|source| SourceError::Json {
      path: path.clone(),
      source,
    })?;
    records(file, value).map_err(|source| SourceError::Shape { path, source })
  }
}

impl ContentSource for JsonDirSource {
  type Error = SourceError;

  fn name(&self) -> &str { &self.name }

  fn load(&self) -> Result<RawSnapshot, SourceError> {
    Ok(RawSnapshot {
      personas:    self.read("personas.json")?,
      skills:      self.read("skills.json")?,
      articles:    self.read("articles.json")?,
      collections: self.read("collections.json")?,
      items:       self.read("items.json")?,
      resume:      self.read("resume.json")?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio-check-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn missing_files_are_empty() {
    let dir = scratch("sparse");
    fs::write(dir.join("skills.json"), r#"[{ "key": "rust" }, { "key": "go" }]"#).unwrap();
    fs::write(dir.join("resume.json"), "null").unwrap();

    let raw = JsonDirSource::new(&dir).load().unwrap();
    assert_eq!(raw.skills.len(), 2);
    assert!(raw.personas.is_empty());
    assert!(raw.resume.is_empty());

    fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn non_array_documents_are_rejected() {
    let dir = scratch("object");
    fs::write(dir.join("articles.json"), r#"{ "slug": "post" }"#).unwrap();

    let err = JsonDirSource::new(&dir).load().unwrap_err();
    assert!(matches!(err, SourceError::Shape { .. }));
    assert!(err.to_string().contains("articles.json"));

    fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn malformed_json_names_the_file() {
    let dir = scratch("malformed");
    fs::write(dir.join("personas.json"), "[{").unwrap();

    let err = JsonDirSource::new(&dir).load().unwrap_err();
    assert!(matches!(err, SourceError::Json { .. }));
    assert!(err.to_string().contains("personas.json"));

    fs::remove_dir_all(&dir).ok();
  }
}
