//! Content snapshots and the `ContentSource` seam.
//!
//! A [`RawSnapshot`] is whatever a content loader produced: untyped JSON
//! arrays, one per content kind. [`RawSnapshot::validate`] runs the schema
//! validator over every record and yields a typed [`ContentSnapshot`] of the
//! records that passed, plus an [`ItemFailure`] for each that did not.
//! Graph-wide checks run over the typed snapshot only.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
  content::{
    BlogArticle, ContentKind, Persona, PortfolioCollection, PortfolioItem,
    ResumeEntry, Skill,
  },
  error::{Error, Result},
  report::{FieldError, Validated},
  schema,
};

// ─── Source trait ────────────────────────────────────────────────────────────

/// Abstraction over wherever content comes from (files, a CMS export, test
/// fixtures). Implementations do I/O; everything downstream is pure.
pub trait ContentSource {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Human-readable name used in diagnostics.
  fn name(&self) -> &str;

  /// Load every record as untyped JSON.
  fn load(&self) -> Result<RawSnapshot, Self::Error>;
}

// ─── Raw snapshot ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
  #[serde(default)]
  pub personas:    Vec<Value>,
  #[serde(default)]
  pub skills:      Vec<Value>,
  #[serde(default)]
  pub articles:    Vec<Value>,
  #[serde(default)]
  pub collections: Vec<Value>,
  #[serde(default)]
  pub items:       Vec<Value>,
  #[serde(default)]
  pub resume:      Vec<Value>,
}

/// A record that failed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
  pub kind:   ContentKind,
  /// Position in the source array.
  pub index:  usize,
  /// The record's key or slug, when one could be read.
  pub id:     Option<String>,
  pub errors: Vec<FieldError>,
}

impl ItemFailure {
  /// `"blog_article #3 (my-post): slug: Slug must be ..."`, one line per error.
  pub fn describe(&self) -> Vec<String> {
    let who = match &self.id {
      Some(id) => format!("{} #{} ({id})", self.kind, self.index),
      None => format!("{} #{}", self.kind, self.index),
    };
    self
      .errors
      .iter()
      .map(|e| {
        if e.field.is_empty() {
          format!("{who}: {}", e.message)
        } else {
          format!("{who}: {}: {}", e.field, e.message)
        }
      })
      .collect()
  }
}

/// Split a JSON document into records: either a bare array or `null`.
pub fn records(kind: &'static str, value: Value) -> Result<Vec<Value>> {
  match value {
    Value::Array(items) => Ok(items),
    Value::Null => Ok(Vec::new()),
    other => Err(Error::NotAnArray {
      kind,
      found: match other {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        _ => "object",
      },
    }),
  }
}

impl RawSnapshot {
  /// Schema-validate every record.
  pub fn validate(&self) -> (ContentSnapshot, Vec<ItemFailure>) {
    let mut failures = Vec::new();
    let snapshot = ContentSnapshot {
      personas:    collect(
        &self.personas,
        ContentKind::Persona,
        "key",
        schema::validate_persona,
        &mut failures,
      ),
      skills:      collect(
        &self.skills,
        ContentKind::Skill,
        "key",
        schema::validate_skill,
        &mut failures,
      ),
      articles:    collect(
        &self.articles,
        ContentKind::BlogArticle,
        "slug",
        schema::validate_blog_article,
        &mut failures,
      ),
      collections: collect(
        &self.collections,
        ContentKind::PortfolioCollection,
        "key",
        schema::validate_portfolio_collection,
        &mut failures,
      ),
      items:       collect(
        &self.items,
        ContentKind::PortfolioItem,
        "slug",
        schema::validate_portfolio_item,
        &mut failures,
      ),
      resume:      collect(
        &self.resume,
        ContentKind::ResumeEntry,
        "slug",
        schema::validate_resume_entry,
        &mut failures,
      ),
    };
    debug!(
      records = snapshot.len(),
      failures = failures.len(),
      "schema validation finished"
    );
    (snapshot, failures)
  }
}

fn collect<T>(
  raw: &[Value],
  kind: ContentKind,
  id_field: &str,
  validate: fn(&Value) -> Validated<T>,
  failures: &mut Vec<ItemFailure>,
) -> Vec<T> {
  let mut out = Vec::with_capacity(raw.len());
  for (index, value) in raw.iter().enumerate() {
    match validate(value) {
      Validated::Valid(item) => out.push(item),
      Validated::Invalid(errors) => failures.push(ItemFailure {
        kind,
        index,
        id: value
          .get(id_field)
          .and_then(Value::as_str)
          .map(str::to_owned),
        errors,
      }),
    }
  }
  out
}

// ─── Typed snapshot ──────────────────────────────────────────────────────────

/// Every schema-valid record, grouped by kind. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
  pub personas:    Vec<Persona>,
  pub skills:      Vec<Skill>,
  pub articles:    Vec<BlogArticle>,
  pub collections: Vec<PortfolioCollection>,
  pub items:       Vec<PortfolioItem>,
  pub resume:      Vec<ResumeEntry>,
}

impl ContentSnapshot {
  pub fn len(&self) -> usize {
    self.personas.len()
      + self.skills.len()
      + self.articles.len()
      + self.collections.len()
      + self.items.len()
      + self.resume.len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn persona(&self, key: &str) -> Option<&Persona> {
    self.personas.iter().find(|p| p.key == key)
  }

  pub fn collection(&self, key: &str) -> Option<&PortfolioCollection> {
    self.collections.iter().find(|c| c.key == key)
  }

  pub fn article(&self, slug: &str) -> Option<&BlogArticle> {
    self.articles.iter().find(|a| a.slug == slug)
  }
}
