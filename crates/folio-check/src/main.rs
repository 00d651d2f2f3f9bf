//! `folio-check`: build-time checker for a Folio content directory.
//!
//! Reads `folio.toml` (or the path given with `--config`), loads the JSON
//! content directory it names, and runs the validation, aggregation and
//! derivation pipelines over it.
//!
//! # Usage
//!
//! ```text
//! folio-check validate
//! folio-check list articles --tag rust --sort title
//! folio-check derive ownership-basics
//! folio-check contact submission.json
//! ```

mod commands;
mod settings;
mod source;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::ListArgs;
use settings::CheckConfig;
use folio_core::snapshot::{ContentSnapshot, ContentSource, RawSnapshot};
use folio_diag::ErrorRegistry;
use serde::Serialize;
use source::JsonDirSource;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Folio content checker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "folio.toml")]
  config: PathBuf,

  /// Content directory; overrides `content_dir` from the config.
  #[arg(long, global = true)]
  content_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Schema-validate every record and run the cross-reference checks.
  Validate,
  /// Filter, sort and page one content kind.
  List(ListArgs),
  /// Reading time, excerpt, table of contents and keywords for one article.
  Derive { slug: String },
  /// Run the contact-form pipeline over a JSON submission.
  Contact { file: PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut config = CheckConfig::load(&cli.config)?;
  if let Some(dir) = cli.content_dir {
    config.content_dir = dir;
  }

  match cli.command {
    Command::Validate => {
      let summary = commands::validate(&load(&config)?, &config);
      print_json(&summary)?;
      Ok(exit_code(summary.passed))
    }
    Command::List(args) => {
      let snapshot = load_valid(&config)?;
      print_json(&commands::list(snapshot, &args)?)?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Derive { slug } => {
      let snapshot = load_valid(&config)?;
      print_json(&commands::derive(&snapshot, &slug, &config)?)?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Contact { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      let submission = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", file.display()))?;
      let mut registry = ErrorRegistry::new(config.registry_capacity);
      let verdict = commands::contact(&submission, &mut registry);
      print_json(&verdict)?;
      Ok(exit_code(verdict.valid))
    }
  }
}

fn load(config: &CheckConfig) -> anyhow::Result<RawSnapshot> {
  let source = JsonDirSource::new(&config.content_dir);
  info!(source = source.name(), "loading content");
  source
    .load()
    .with_context(|| format!("failed to load content from {}", source.name()))
}

/// Load and keep only schema-valid records.
fn load_valid(config: &CheckConfig) -> anyhow::Result<ContentSnapshot> {
  let (snapshot, failures) = load(config)?.validate();
  if !failures.is_empty() {
    warn!(
      rejected = failures.len(),
      "records failed schema validation and were skipped; run `validate` for details"
    );
  }
  Ok(snapshot)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn exit_code(passed: bool) -> ExitCode {
  if passed {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}
