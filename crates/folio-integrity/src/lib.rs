//! Graph-wide integrity checks for a Folio content snapshot.
//!
//! Each check is a pure function of a [`ContentSnapshot`] returning a
//! [`Report`]: broken references are errors, stale or suspicious ones are
//! warnings. [`validate_all`] runs every check in a fixed order and merges
//! the results, so the same snapshot always yields the same report.
//!
//! ```no_run
//! use folio_core::snapshot::ContentSnapshot;
//!
//! let report = folio_integrity::validate_all(&ContentSnapshot::default());
//! assert!(report.valid);
//! ```

mod articles;
mod keys;
mod personas;
mod portfolio;
mod resume;
mod skills;

pub use articles::{validate_related_articles, validate_series_references};
use chrono::{NaiveDate, Utc};
use folio_core::{Report, dates::GapOptions, snapshot::ContentSnapshot};
pub use keys::validate_unique_keys;
pub use personas::{validate_persona_references, validate_primary_persona};
pub use portfolio::{validate_collection_item_counts, validate_portfolio_references};
pub use resume::{
  validate_resume_gaps, validate_resume_gaps_at, validate_resume_overlaps,
  validate_resume_overlaps_at, validate_resume_references,
};
pub use skills::{
  SkillIndex, validate_orphan_skills, validate_persona_skills, validate_portfolio_skills,
};
use tracing::debug;

/// Tunables for [`validate_all_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityOptions {
  pub gaps:  GapOptions,
  /// The day current resume entries run through.
  pub today: NaiveDate,
}

impl Default for IntegrityOptions {
  fn default() -> Self {
    Self {
      gaps:  GapOptions::default(),
      today: Utc::now().date_naive(),
    }
  }
}

/// Run every check with default options.
pub fn validate_all(snapshot: &ContentSnapshot) -> Report {
  validate_all_with(snapshot, &IntegrityOptions::default())
}

pub fn validate_all_with(snapshot: &ContentSnapshot, options: &IntegrityOptions) -> Report {
  let steps: [(&str, Report); 13] = [
    ("unique_keys", validate_unique_keys(snapshot)),
    ("primary_persona", validate_primary_persona(snapshot)),
    ("persona_references", validate_persona_references(snapshot)),
    ("persona_skills", validate_persona_skills(snapshot)),
    ("portfolio_references", validate_portfolio_references(snapshot)),
    ("portfolio_skills", validate_portfolio_skills(snapshot)),
    ("collection_item_counts", validate_collection_item_counts(snapshot)),
    ("series_references", validate_series_references(snapshot)),
    ("related_articles", validate_related_articles(snapshot)),
    ("resume_references", validate_resume_references(snapshot)),
    ("resume_overlaps", validate_resume_overlaps_at(snapshot, options.today)),
    ("resume_gaps", validate_resume_gaps_at(snapshot, &options.gaps, options.today)),
    ("orphan_skills", validate_orphan_skills(snapshot)),
  ];

  let mut report = Report::new();
  for (step, result) in steps {
    debug!(
      step,
      errors = result.errors.len(),
      warnings = result.warnings.len(),
      "integrity check finished"
    );
    report.merge(result);
  }
  report
}

#[cfg(test)]
mod tests;
