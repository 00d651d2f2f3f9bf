//! Query parameters and the result envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Aggregatable;

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Conjunction of optional predicates. An absent predicate matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
  pub persona:   Option<String>,
  /// Case-insensitive equality.
  pub category:  Option<String>,
  /// Matches when any tag intersects, ignoring case.
  #[serde(default)]
  pub tags:      Vec<String>,
  pub featured:  Option<bool>,
  /// Inclusive; records without a date never match a date bound.
  pub date_from: Option<DateTime<Utc>>,
  pub date_to:   Option<DateTime<Utc>>,
  /// Case-insensitive substring over the type's searchable fields and tags.
  pub search:    Option<String>,
}

impl Filters {
  pub fn matches<T: Aggregatable>(&self, item: &T) -> bool {
    if let Some(persona) = &self.persona
      && item.persona() != persona
    {
      return false;
    }
    if let Some(category) = &self.category
      && !item
        .category()
        .is_some_and(|c| c.eq_ignore_ascii_case(category))
    {
      return false;
    }
    if !self.tags.is_empty() {
      let tags = &item.meta().tags;
      let hit = self
        .tags
        .iter()
        .any(|want| tags.iter().any(|t| t.eq_ignore_ascii_case(want)));
      if !hit {
        return false;
      }
    }
    if let Some(featured) = self.featured
      && item.meta().featured != featured
    {
      return false;
    }
    if self.date_from.is_some() || self.date_to.is_some() {
      let Some(date) = item.date() else {
        return false;
      };
      if self.date_from.is_some_and(|from| date < from)
        || self.date_to.is_some_and(|to| date > to)
      {
        return false;
      }
    }
    if let Some(needle) = self.search.as_deref().map(str::trim)
      && !needle.is_empty()
    {
      let needle = needle.to_lowercase();
      let found = item
        .search_fields()
        .into_iter()
        .chain(item.meta().tags.iter().map(String::as_str))
        .any(|field| field.to_lowercase().contains(&needle));
      if !found {
        return false;
      }
    }
    true
  }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<F> {
  pub field:     F,
  pub direction: SortDirection,
}

impl<F> Sort<F> {
  pub fn asc(field: F) -> Self {
    Self {
      field,
      direction: SortDirection::Asc,
    }
  }

  pub fn desc(field: F) -> Self {
    Self {
      field,
      direction: SortDirection::Desc,
    }
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const DEFAULT_LIMIT: u32 = 12;
pub const MAX_LIMIT: u32 = 100;

/// 1-based page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub page:  u32,
  pub limit: u32,
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      page:  1,
      limit: DEFAULT_LIMIT,
    }
  }
}

impl Pagination {
  pub fn new(page: u32, limit: u32) -> Self { Self { page, limit }.normalized() }

  /// Page 0 becomes 1; limit is clamped to `1..=MAX_LIMIT`.
  pub fn normalized(self) -> Self {
    Self {
      page:  self.page.max(1),
      limit: self.limit.clamp(1, MAX_LIMIT),
    }
  }

  pub fn offset(&self) -> usize {
    let p = self.normalized();
    (p.page as usize - 1).saturating_mul(p.limit as usize)
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// One page of an aggregation plus the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregated<T, F> {
  pub items:    Vec<T>,
  /// Matches before pagination.
  pub total:    usize,
  pub page:     u32,
  pub limit:    u32,
  pub has_more: bool,
  pub filters:  Filters,
  pub sort:     Sort<F>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pagination_is_normalized() {
    assert_eq!(Pagination::new(0, 0), Pagination { page: 1, limit: 1 });
    assert_eq!(Pagination::new(3, 500).limit, MAX_LIMIT);
    assert_eq!(Pagination::new(3, 12).offset(), 24);
    assert_eq!(Pagination { page: 0, limit: 12 }.offset(), 0);
  }

  #[test]
  fn filters_deserialize_from_camel_case() {
    let f: Filters = serde_json::from_str(
      r#"{"persona":"developer","dateFrom":"2024-01-01T00:00:00Z","tags":["rust"]}"#,
    )
    .unwrap();
    assert_eq!(f.persona.as_deref(), Some("developer"));
    assert!(f.date_from.is_some());
    assert_eq!(f.tags, vec!["rust"]);
  }
}
