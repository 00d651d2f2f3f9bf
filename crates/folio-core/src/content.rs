//! Content types: the declarative records a portfolio site is built from.
//!
//! Every record is immutable once validated. References between records are
//! plain string keys; whether they resolve is decided graph-wide by the
//! integrity checks, never here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ─── Shared metadata ─────────────────────────────────────────────────────────

/// Metadata shared by every content record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
  pub title:       String,
  pub description: Option<String>,
  /// Drafts are excluded from public aggregation by default.
  #[serde(default)]
  pub draft:       bool,
  #[serde(default)]
  pub featured:    bool,
  #[serde(default)]
  pub tags:        Vec<String>,
  pub created_at:  Option<DateTime<Utc>>,
  pub updated_at:  Option<DateTime<Utc>>,
}

// ─── Personas ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
  pub platform: String,
  pub url:      String,
}

/// A named viewpoint under which content is organised. Exactly one non-draft
/// persona in a snapshot is primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
  pub key:          String,
  pub name:         String,
  pub headline:     Option<String>,
  pub bio:          Option<String>,
  #[serde(default)]
  pub primary:      bool,
  /// Skill keys this persona claims.
  #[serde(default)]
  pub skills:       Vec<String>,
  #[serde(default)]
  pub interests:    Vec<String>,
  #[serde(default)]
  pub social_links: Vec<SocialLink>,
  #[serde(flatten)]
  pub meta:         Meta,
}

// ─── Skills ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SkillCategory {
  Language,
  Framework,
  Tool,
  Methodology,
  SoftSkill,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Proficiency {
  Beginner,
  Intermediate,
  Advanced,
  Expert,
}

impl Proficiency {
  /// Ordinal used for numeric sorting, 1 (beginner) through 4 (expert).
  pub fn rank(self) -> u8 {
    match self {
      Self::Beginner => 1,
      Self::Intermediate => 2,
      Self::Advanced => 3,
      Self::Expert => 4,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
  pub key:              String,
  pub name:             String,
  pub category:         SkillCategory,
  pub proficiency:      Proficiency,
  pub years_experience: f64,
  /// Free-form project references (portfolio slugs or names).
  #[serde(default)]
  pub projects:         Vec<String>,
  pub persona:          String,
  #[serde(flatten)]
  pub meta:             Meta,
}

// ─── Blog ────────────────────────────────────────────────────────────────────

/// Membership of an article in a numbered series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
  pub name:  String,
  pub part:  u32,
  pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogArticle {
  pub slug:             String,
  pub persona:          String,
  pub category:         Option<String>,
  pub series:           Option<Series>,
  #[serde(default)]
  pub related_articles: Vec<String>,
  pub published_at:     DateTime<Utc>,
  /// Author-supplied excerpt; preferred verbatim over a generated one.
  pub excerpt:          Option<String>,
  /// Markdown body.
  pub content:          Option<String>,
  #[serde(flatten)]
  pub meta:             Meta,
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioCollection {
  pub key:        String,
  pub name:       String,
  /// Declared count; compared against the actual non-draft item count.
  pub item_count: u32,
  #[serde(default)]
  pub sort_order: i32,
  pub persona:    String,
  #[serde(flatten)]
  pub meta:       Meta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
  pub src: String,
  pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
  /// Unique within its collection.
  pub slug:         String,
  pub collection:   String,
  pub persona:      String,
  pub category:     Option<String>,
  pub images:       Vec<Image>,
  #[serde(default)]
  pub technologies: Vec<String>,
  #[serde(default)]
  pub sort_order:   i32,
  pub date:         Option<DateTime<Utc>>,
  #[serde(flatten)]
  pub meta:         Meta,
}

// ─── Resume ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResumeType {
  Employment,
  Contract,
  Freelance,
  Volunteer,
  Internship,
  Education,
}

impl ResumeType {
  /// Whether entries of this type take part in overlap detection.
  pub fn is_employment(self) -> bool { matches!(self, Self::Employment) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeEntry {
  pub slug:         String,
  pub company:      String,
  pub position:     String,
  pub start_date:   NaiveDate,
  pub end_date:     Option<NaiveDate>,
  #[serde(default)]
  pub current:      bool,
  #[serde(rename = "type")]
  pub entry_type:   ResumeType,
  pub location:     Option<String>,
  #[serde(default)]
  pub skills:       Vec<String>,
  #[serde(default)]
  pub technologies: Vec<String>,
  pub persona:      String,
  #[serde(flatten)]
  pub meta:         Meta,
}

impl ResumeEntry {
  /// The last day this entry counts as active. Current entries (and entries
  /// with no end date) run through `today`.
  pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
    match self.end_date {
      Some(end) if !self.current => end,
      _ => today,
    }
  }

  /// Every skill-like reference on this entry.
  pub fn skill_refs(&self) -> impl Iterator<Item = &str> {
    self
      .skills
      .iter()
      .chain(self.technologies.iter())
      .map(String::as_str)
  }
}

// ─── Contact form ────────────────────────────────────────────────────────────

/// A contact-form submission. Never persisted; validated and handed to a
/// delivery adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
  pub name:      String,
  pub email:     String,
  pub subject:   Option<String>,
  pub message:   String,
  /// Hidden field; must be absent or empty for a human submission.
  pub honeypot:  Option<String>,
  /// When the form was rendered, in epoch milliseconds.
  pub timestamp: Option<i64>,
  pub persona:   Option<String>,
}

// ─── Kind tags ───────────────────────────────────────────────────────────────

/// Discriminates content records in messages and failure reports.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
  Persona,
  Skill,
  BlogArticle,
  PortfolioCollection,
  PortfolioItem,
  ResumeEntry,
  ContactSubmission,
}
