use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use folio_core::Report;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  DEFAULT_CAPACITY,
  category::{ErrorCategory, Severity},
  ring::{Ring, SubscriptionId},
};

// ─── Records ─────────────────────────────────────────────────────────────────

/// A structured application error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
  pub id:          Uuid,
  pub category:    ErrorCategory,
  pub severity:    Severity,
  pub message:     String,
  /// Where it happened: entity kind, key, field, …
  #[serde(default)]
  pub context:     BTreeMap<String, String>,
  pub retryable:   bool,
  pub occurred_at: DateTime<Utc>,
}

impl AppError {
  /// Severity and retryability start from the category defaults.
  pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      category,
      severity: category.default_severity(),
      message: message.into(),
      context: BTreeMap::new(),
      retryable: category.retryable(),
      occurred_at: Utc::now(),
    }
  }

  pub fn with_severity(mut self, severity: Severity) -> Self {
    self.severity = severity;
    self
  }

  pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.context.insert(key.into(), value.into());
    self
  }

  /// Override, e.g. a form failure flagged as a bot is not worth retrying.
  pub fn with_retryable(mut self, retryable: bool) -> Self {
    self.retryable = retryable;
    self
  }

  pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
    self.occurred_at = occurred_at;
    self
  }
}

/// Every `Some` field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFilter {
  pub category:     Option<ErrorCategory>,
  /// Inclusive lower bound.
  pub min_severity: Option<Severity>,
  pub retryable:    Option<bool>,
  pub since:        Option<DateTime<Utc>>,
  pub until:        Option<DateTime<Utc>>,
}

impl ErrorFilter {
  pub fn matches(&self, e: &AppError) -> bool {
    self.category.is_none_or(|c| e.category == c)
      && self.min_severity.is_none_or(|s| e.severity >= s)
      && self.retryable.is_none_or(|r| e.retryable == r)
      && self.since.is_none_or(|t| e.occurred_at >= t)
      && self.until.is_none_or(|t| e.occurred_at <= t)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStats {
  /// Entries currently held.
  pub retained:          usize,
  /// Entries ever recorded since the last clear.
  pub recorded:          u64,
  pub by_category:       BTreeMap<ErrorCategory, usize>,
  pub by_severity:       BTreeMap<Severity, usize>,
  pub retryable:         usize,
  pub listener_failures: u64,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Keeps the most recent errors in a bounded buffer and mirrors each one to
/// `tracing`. Instances are independent; share one only when cross-request
/// aggregation is wanted.
pub struct ErrorRegistry {
  ring: Ring<AppError>,
}

impl Default for ErrorRegistry {
  fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl std::fmt::Debug for ErrorRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ErrorRegistry")
      .field("capacity", &self.ring.capacity())
      .field("retained", &self.ring.len())
      .finish()
  }
}

impl ErrorRegistry {
  pub fn new(capacity: usize) -> Self {
    Self {
      ring: Ring::new(capacity),
    }
  }

  pub fn record(&mut self, error: AppError) -> Uuid {
    let id = error.id;
    let category = error.category.as_ref();
    match error.severity {
      Severity::Low => info!(%id, category, message = %error.message, "error recorded"),
      Severity::Medium => warn!(%id, category, message = %error.message, "error recorded"),
      Severity::High | Severity::Critical => {
        error!(%id, category, severity = %error.severity, message = %error.message, "error recorded")
      }
    }
    self.ring.push(error);
    id
  }

  /// Record each error line of `report` under `category`. Returns how many
  /// were recorded.
  pub fn record_report(&mut self, category: ErrorCategory, source: &str, report: &Report) -> usize {
    for message in &report.errors {
      self.record(AppError::new(category, message.clone()).with_context("source", source));
    }
    report.errors.len()
  }

  /// Up to `n` entries, newest first.
  pub fn recent(&self, n: usize) -> Vec<&AppError> { self.ring.iter().rev().take(n).collect() }

  /// Matching entries, oldest first.
  pub fn filter(&self, filter: &ErrorFilter) -> Vec<&AppError> {
    self.ring.iter().filter(|e| filter.matches(e)).collect()
  }

  pub fn stats(&self) -> ErrorStats {
    let mut stats = ErrorStats {
      retained: self.ring.len(),
      recorded: self.ring.recorded,
      listener_failures: self.ring.listener_failures,
      ..Default::default()
    };
    for e in self.ring.iter() {
      *stats.by_category.entry(e.category).or_default() += 1;
      *stats.by_severity.entry(e.severity).or_default() += 1;
      if e.retryable {
        stats.retryable += 1;
      }
    }
    stats
  }

  /// Called synchronously for every recorded error.
  pub fn subscribe(&mut self, listener: impl Fn(&AppError) + Send + Sync + 'static) -> SubscriptionId {
    self.ring.subscribe(Box::new(listener))
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool { self.ring.unsubscribe(id) }

  pub fn len(&self) -> usize { self.ring.len() }

  pub fn is_empty(&self) -> bool { self.ring.len() == 0 }

  pub fn clear(&mut self) { self.ring.clear(); }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use chrono::TimeZone;

  use super::*;

  fn at(hour: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap() }

  #[test]
  fn keeps_only_the_most_recent_entries() {
    let mut reg = ErrorRegistry::new(3);
    for i in 0..5 {
      reg.record(AppError::new(ErrorCategory::Validation, format!("e{i}")));
    }
    let recent: Vec<&str> = reg.recent(10).iter().map(|e| e.message.as_str()).collect();
    assert_eq!(recent, vec!["e4", "e3", "e2"]);
    let stats = reg.stats();
    assert_eq!(stats.retained, 3);
    assert_eq!(stats.recorded, 5);
  }

  #[test]
  fn filters_by_category_severity_and_time() {
    let mut reg = ErrorRegistry::default();
    reg.record(AppError::new(ErrorCategory::Validation, "bad slug").at(at(1)));
    reg.record(AppError::new(ErrorCategory::System, "boom").at(at(2)));
    reg.record(
      AppError::new(ErrorCategory::External, "mailer down")
        .with_severity(Severity::Critical)
        .at(at(3)),
    );

    let serious = reg.filter(&ErrorFilter {
      min_severity: Some(Severity::High),
      ..Default::default()
    });
    assert_eq!(serious.len(), 2);

    let window = reg.filter(&ErrorFilter {
      since: Some(at(2)),
      until: Some(at(2)),
      ..Default::default()
    });
    assert_eq!(window[0].message, "boom");

    let retryable = reg.filter(&ErrorFilter {
      retryable: Some(true),
      ..Default::default()
    });
    assert_eq!(retryable.len(), 2);

    let stats = reg.stats();
    assert_eq!(stats.by_category[&ErrorCategory::System], 1);
    assert_eq!(stats.by_severity[&Severity::Critical], 1);
    assert_eq!(stats.retryable, 2);
  }

  #[test]
  fn panicking_listener_does_not_abort_record() {
    let mut reg = ErrorRegistry::default();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    reg.subscribe(|_| panic!("listener bug"));
    reg.subscribe(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    reg.record(AppError::new(ErrorCategory::Form, "honeypot"));
    assert_eq!(reg.len(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(reg.stats().listener_failures, 1);
  }

  #[test]
  fn unsubscribe_and_clear() {
    let mut reg = ErrorRegistry::default();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let id = reg.subscribe(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });
    reg.record(AppError::new(ErrorCategory::Content, "missing"));
    assert!(reg.unsubscribe(id));
    reg.record(AppError::new(ErrorCategory::Content, "missing again"));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    reg.clear();
    assert!(reg.is_empty());
    assert_eq!(reg.stats(), ErrorStats::default());
  }

  #[test]
  fn reports_become_validation_errors() {
    let mut report = Report::new();
    report.error("persona `ghost` does not exist");
    report.warn("only a warning");
    let mut reg = ErrorRegistry::default();
    assert_eq!(reg.record_report(ErrorCategory::Validation, "integrity", &report), 1);
    assert_eq!(reg.recent(1)[0].context["source"], "integrity");
  }
}
