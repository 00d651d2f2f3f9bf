//! Subcommand bodies. Each takes already-loaded input and returns a
//! serialisable result; `main` does the I/O and picks the exit code.

use std::str::FromStr;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use folio_aggregate::{Aggregatable, Aggregator, Filters, Pagination, Sort, SortDirection};
use folio_content::validate_markdown;
use folio_core::{
  Report,
  snapshot::{ContentSnapshot, RawSnapshot},
};
use folio_diag::{
  AppError, ErrorCategory, ErrorRegistry, ErrorStats, LogLevel, LogRegistry, LogStats,
};
use folio_forms::{ContactFormValidator, FormVerdict};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::settings::CheckConfig;

// ─── validate ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
  /// False when there are errors, or warnings under `fail_on_warnings`.
  pub passed:   bool,
  /// Schema-valid records that went on to the cross-reference checks.
  pub records:  usize,
  /// Records rejected by the schema validator.
  pub rejected: usize,
  pub report:   Report,
  pub errors:   ErrorStats,
  pub log:      LogStats,
}

/// Schema, cross-reference and markdown checks over everything in `raw`.
pub fn validate(raw: &RawSnapshot, config: &CheckConfig) -> ValidationSummary {
  let mut registry = ErrorRegistry::new(config.registry_capacity);
  let mut log = LogRegistry::new(config.registry_capacity);

  let (snapshot, failures) = raw.validate();
  let mut schema = Report::new();
  for line in failures.iter().flat_map(|f| f.describe()) {
    schema.error(line);
  }
  registry.record_report(ErrorCategory::Validation, "schema", &schema);
  log.log(
    LogLevel::Info,
    format!("{} records passed schema validation, {} rejected", snapshot.len(), failures.len()),
  );

  let integrity = folio_integrity::validate_all_with(&snapshot, &config.integrity_options());
  registry.record_report(ErrorCategory::Validation, "integrity", &integrity);

  let markdown = markdown_report(&snapshot);
  registry.record_report(ErrorCategory::Content, "markdown", &markdown);

  let report = schema.merged(integrity).merged(markdown);
  for warning in &report.warnings {
    log.log(LogLevel::Warn, warning.clone());
  }

  let passed = report.valid && !(config.fail_on_warnings && !report.warnings.is_empty());
  info!(
    passed,
    errors = report.errors.len(),
    warnings = report.warnings.len(),
    "validation finished"
  );

  ValidationSummary {
    passed,
    records: snapshot.len(),
    rejected: failures.len(),
    report,
    errors: registry.stats(),
    log: log.stats(),
  }
}

/// Markdown problems in every article body, prefixed with the article slug.
fn markdown_report(snapshot: &ContentSnapshot) -> Report {
  let mut out = Report::new();
  for article in &snapshot.articles {
    let Some(body) = article.content.as_deref() else {
      continue;
    };
    let found = validate_markdown(body);
    for e in found.errors {
      out.error(format!("blog_article `{}`: {e}", article.slug));
    }
    for w in found.warnings {
      out.warn(format!("blog_article `{}`: {w}", article.slug));
    }
  }
  out
}

// ─── list ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
  Articles,
  Portfolio,
  Collections,
  Resume,
  Skills,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
  pub kind: ListKind,

  #[arg(long)]
  pub persona: Option<String>,

  #[arg(long)]
  pub category: Option<String>,

  /// Repeatable; matches when any tag is present.
  #[arg(long = "tag")]
  pub tags: Vec<String>,

  #[arg(long)]
  pub featured: Option<bool>,

  /// RFC 3339 timestamp, inclusive.
  #[arg(long)]
  pub from: Option<DateTime<Utc>>,

  /// RFC 3339 timestamp, inclusive.
  #[arg(long)]
  pub to: Option<DateTime<Utc>>,

  #[arg(long)]
  pub search: Option<String>,

  /// Sort field in camelCase, e.g. `publishedAt`. Defaults to the kind's
  /// natural order.
  #[arg(long)]
  pub sort: Option<String>,

  /// `asc` or `desc`.
  #[arg(long)]
  pub direction: Option<SortDirection>,

  #[arg(long, default_value_t = 1)]
  pub page: u32,

  #[arg(long, default_value_t = folio_aggregate::DEFAULT_LIMIT)]
  pub limit: u32,

  /// Include drafts.
  #[arg(long)]
  pub drafts: bool,

  /// Print tag and category counts instead of a page.
  #[arg(long, conflicts_with = "related")]
  pub facets: bool,

  /// Print records related to this key or slug instead of a page.
  #[arg(long, value_name = "ID")]
  pub related: Option<String>,
}

impl ListArgs {
  fn filters(&self) -> Filters {
    Filters {
      persona:   self.persona.clone(),
      category:  self.category.clone(),
      tags:      self.tags.clone(),
      featured:  self.featured,
      date_from: self.from,
      date_to:   self.to,
      search:    self.search.clone(),
    }
  }
}

pub fn list(snapshot: ContentSnapshot, args: &ListArgs) -> anyhow::Result<Value> {
  match args.kind {
    ListKind::Articles => aggregate(snapshot.articles, args),
    ListKind::Portfolio => aggregate(snapshot.items, args),
    ListKind::Collections => aggregate(snapshot.collections, args),
    ListKind::Resume => aggregate(snapshot.resume, args),
    ListKind::Skills => aggregate(snapshot.skills, args),
  }
}

fn aggregate<T>(items: Vec<T>, args: &ListArgs) -> anyhow::Result<Value>
where
  T: Aggregatable + Serialize,
  T::SortField: FromStr,
  <T::SortField as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
  let aggregator = if args.drafts {
    Aggregator::with_drafts(items)
  } else {
    Aggregator::new(items)
  };

  if args.facets {
    return Ok(serde_json::to_value(aggregator.facets())?);
  }

  if let Some(id) = &args.related {
    let item = aggregator
      .get(id)
      .with_context(|| format!("no {:?} record with id `{id}`", args.kind))?;
    return Ok(serde_json::to_value(aggregator.related(item, args.limit as usize))?);
  }

  let sort = match &args.sort {
    Some(field) => Some(Sort {
      field:     field
        .parse::<T::SortField>()
        .with_context(|| format!("unknown sort field `{field}`"))?,
      direction: args.direction.unwrap_or_default(),
    }),
    None => args.direction.map(|direction| Sort {
      direction,
      ..T::default_sort()
    }),
  };

  let page = aggregator.aggregate(&args.filters(), sort, Pagination::new(args.page, args.limit));
  Ok(serde_json::to_value(page)?)
}

// ─── derive ──────────────────────────────────────────────────────────────────

pub fn derive(snapshot: &ContentSnapshot, slug: &str, config: &CheckConfig) -> anyhow::Result<Value> {
  let article = snapshot
    .article(slug)
    .with_context(|| format!("no schema-valid article with slug `{slug}`"))?;
  let derived = folio_content::derive(article, &config.derive_options());
  Ok(serde_json::to_value(derived)?)
}

// ─── contact ─────────────────────────────────────────────────────────────────

/// Run the form pipeline and record its errors. Bot rejections are not
/// worth retrying; other form errors are.
pub fn contact(submission: &Value, registry: &mut ErrorRegistry) -> FormVerdict {
  let verdict = ContactFormValidator::default().validate_submission(submission);
  for message in &verdict.errors {
    registry.record(
      AppError::new(ErrorCategory::Form, message.clone()).with_retryable(!verdict.bot_detected),
    );
  }
  verdict
}

#[cfg(test)]
mod tests {
  use clap::Parser;
  use serde_json::json;

  use super::*;

  #[derive(Parser)]
  struct ListCli {
    #[command(flatten)]
    args: ListArgs,
  }

  fn list_args(argv: &[&str]) -> ListArgs {
    ListCli::parse_from(std::iter::once("list").chain(argv.iter().copied())).args
  }

  fn raw() -> RawSnapshot {
    RawSnapshot {
      personas: vec![json!({
        "key": "developer", "name": "Ada", "primary": true, "title": "Developer",
        "skills": ["rust"]
      })],
      skills: vec![json!({
        "key": "rust", "name": "Rust", "category": "language", "proficiency": "expert",
        "yearsExperience": 6, "persona": "developer", "title": "Rust"
      })],
      articles: vec![
        json!({
          "slug": "ownership", "persona": "developer", "title": "Ownership",
          "publishedAt": "2024-02-01T10:00:00Z", "tags": ["rust"],
          "content": "# Ownership\n\nEvery value has one owner. Moves transfer it."
        }),
        json!({
          "slug": "borrowing", "persona": "developer", "title": "Borrowing",
          "publishedAt": "2024-03-01T10:00:00Z", "tags": ["rust"],
          "content": "# Borrowing\n\n### Deep\n\nReferences borrow."
        }),
        json!({ "slug": "Broken Slug", "persona": "developer", "title": "Broken" }),
      ],
      ..Default::default()
    }
  }

  #[test]
  fn validate_merges_schema_and_markdown_findings() {
    let summary = validate(&raw(), &CheckConfig::default());
    assert!(!summary.passed);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.records, 4);
    assert!(summary.report.errors.iter().any(|e| e.starts_with("blog_article #2 (Broken Slug)")));
    assert!(summary.report.warnings.iter().any(|w| w.starts_with("blog_article `borrowing`")));
    assert_eq!(summary.errors.recorded as usize, summary.report.errors.len());
  }

  #[test]
  fn warnings_fail_only_when_configured() {
    let mut raw = raw();
    raw.articles.truncate(2);
    let lenient = validate(&raw, &CheckConfig::default());
    assert!(lenient.passed);
    assert!(!lenient.report.warnings.is_empty());

    let strict = validate(
      &raw,
      &CheckConfig {
        fail_on_warnings: true,
        ..Default::default()
      },
    );
    assert!(!strict.passed);
    assert_eq!(strict.log.by_level[&LogLevel::Warn], strict.report.warnings.len());
  }

  #[test]
  fn list_uses_default_order_unless_told() {
    let (snapshot, _) = raw().validate();
    let page = list(snapshot.clone(), &list_args(&["articles"])).unwrap();
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"][0]["slug"], "borrowing");

    let page = list(snapshot, &list_args(&["articles", "--direction", "asc"])).unwrap();
    assert_eq!(page["items"][0]["slug"], "ownership");
    assert_eq!(page["sort"]["field"], "publishedAt");
  }

  #[test]
  fn list_rejects_unknown_sort_fields() {
    let (snapshot, _) = raw().validate();
    let err = list(snapshot, &list_args(&["articles", "--sort", "wordCount"])).unwrap_err();
    assert!(err.to_string().contains("wordCount"));
  }

  #[test]
  fn list_related_and_facets() {
    let (snapshot, _) = raw().validate();
    let related = list(snapshot.clone(), &list_args(&["articles", "--related", "ownership"])).unwrap();
    assert_eq!(related[0]["item"]["slug"], "borrowing");

    let facets = list(snapshot, &list_args(&["articles", "--facets"])).unwrap();
    assert_eq!(facets["tags"]["rust"], 2);
  }

  #[test]
  fn derive_requires_a_valid_article() {
    let (snapshot, _) = raw().validate();
    let derived = derive(&snapshot, "ownership", &CheckConfig::default()).unwrap();
    assert_eq!(derived["readingTime"]["minutes"], 1);
    assert!(derive(&snapshot, "Broken Slug", &CheckConfig::default()).is_err());
  }

  #[test]
  fn contact_records_form_errors() {
    let mut registry = ErrorRegistry::default();
    let verdict = contact(&json!({ "name": "A", "email": "nope" }), &mut registry);
    assert!(!verdict.valid);
    assert_eq!(registry.len(), verdict.errors.len());
    assert!(registry.recent(1)[0].retryable);
  }
}
