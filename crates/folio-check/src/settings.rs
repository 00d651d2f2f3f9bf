//! Checker configuration: an optional TOML file layered with `FOLIO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use folio_content::{DeriveOptions, ReadingSpeed, ReadingTimeOptions};
use folio_core::dates::GapOptions;
use folio_integrity::IntegrityOptions;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
  /// Directory holding `personas.json`, `articles.json`, ...
  pub content_dir:        PathBuf,
  pub reading_speed:      ReadingSpeed,
  /// Count fenced code toward reading time.
  pub include_code:       bool,
  pub gap_threshold_days: i64,
  /// Treat warnings as failures in `validate`.
  pub fail_on_warnings:   bool,
  pub registry_capacity:  usize,
}

impl Default for CheckConfig {
  fn default() -> Self {
    Self {
      content_dir:        PathBuf::from("content"),
      reading_speed:      ReadingSpeed::Average,
      include_code:       true,
      gap_threshold_days: 31,
      fail_on_warnings:   false,
      registry_capacity:  folio_diag::DEFAULT_CAPACITY,
    }
  }
}

impl CheckConfig {
  /// A missing file is not an error; every key has a default.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FOLIO"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise CheckConfig")
  }

  pub fn integrity_options(&self) -> IntegrityOptions {
    IntegrityOptions {
      gaps: GapOptions {
        min_gap_days: self.gap_threshold_days,
      },
      ..Default::default()
    }
  }

  pub fn derive_options(&self) -> DeriveOptions {
    DeriveOptions {
      reading: ReadingTimeOptions {
        speed: self.reading_speed,
        include_code: self.include_code,
        ..Default::default()
      },
      ..Default::default()
    }
  }
}
