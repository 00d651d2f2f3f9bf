//! Type-aware comparison of sort keys.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::query::SortDirection;

/// A sort key read from a record by a typed accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
  Text(&'a str),
  Number(f64),
  Date(DateTime<Utc>),
  Missing,
}

impl SortValue<'_> {
  fn coerce(&self) -> String {
    match self {
      Self::Text(s) => s.to_string(),
      Self::Number(n) => n.to_string(),
      Self::Date(d) => d.to_rfc3339(),
      Self::Missing => String::new(),
    }
  }
}

fn compare_text(a: &str, b: &str) -> Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

/// Order two keys in `direction`. Missing keys sort last either way; keys
/// of different shapes fall back to comparing their string forms.
pub fn compare(a: &SortValue<'_>, b: &SortValue<'_>, direction: SortDirection) -> Ordering {
  use SortValue::*;

  let ordering = match (a, b) {
    (Missing, Missing) => return Ordering::Equal,
    (Missing, _) => return Ordering::Greater,
    (_, Missing) => return Ordering::Less,
    (Text(x), Text(y)) => compare_text(x, y),
    (Number(x), Number(y)) => x.total_cmp(y),
    (Date(x), Date(y)) => x.cmp(y),
    (x, y) => compare_text(&x.coerce(), &y.coerce()),
  };
  match direction {
    SortDirection::Asc => ordering,
    SortDirection::Desc => ordering.reverse(),
  }
}
