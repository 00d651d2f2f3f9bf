use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  DEFAULT_CAPACITY,
  category::LogLevel,
  ring::{Ring, SubscriptionId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
  pub id:        Uuid,
  pub level:     LogLevel,
  pub message:   String,
  #[serde(default)]
  pub context:   BTreeMap<String, String>,
  pub logged_at: DateTime<Utc>,
}

impl LogEntry {
  pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
    Self {
      id:        Uuid::new_v4(),
      level,
      message:   message.into(),
      context:   BTreeMap::new(),
      logged_at: Utc::now(),
    }
  }

  pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.context.insert(key.into(), value.into());
    self
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
  pub min_level: Option<LogLevel>,
  /// Case-insensitive substring of the message.
  pub contains:  Option<String>,
  pub since:     Option<DateTime<Utc>>,
  pub until:     Option<DateTime<Utc>>,
}

impl LogFilter {
  pub fn matches(&self, entry: &LogEntry) -> bool {
    self.min_level.is_none_or(|l| entry.level >= l)
      && self
        .contains
        .as_ref()
        .is_none_or(|needle| entry.message.to_lowercase().contains(&needle.to_lowercase()))
      && self.since.is_none_or(|t| entry.logged_at >= t)
      && self.until.is_none_or(|t| entry.logged_at <= t)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
  pub retained:          usize,
  pub recorded:          u64,
  pub by_level:          BTreeMap<LogLevel, usize>,
  pub listener_failures: u64,
}

/// Bounded in-memory log. Unlike [`ErrorRegistry`](crate::ErrorRegistry) it
/// does not forward to `tracing`: callers that log here usually already
/// have.
pub struct LogRegistry {
  ring: Ring<LogEntry>,
}

impl Default for LogRegistry {
  fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl std::fmt::Debug for LogRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LogRegistry")
      .field("capacity", &self.ring.capacity())
      .field("retained", &self.ring.len())
      .finish()
  }
}

impl LogRegistry {
  pub fn new(capacity: usize) -> Self {
    Self {
      ring: Ring::new(capacity),
    }
  }

  pub fn record(&mut self, entry: LogEntry) -> Uuid {
    let id = entry.id;
    self.ring.push(entry);
    id
  }

  pub fn log(&mut self, level: LogLevel, message: impl Into<String>) -> Uuid {
    self.record(LogEntry::new(level, message))
  }

  /// Up to `n` entries, newest first.
  pub fn recent(&self, n: usize) -> Vec<&LogEntry> { self.ring.iter().rev().take(n).collect() }

  pub fn filter(&self, filter: &LogFilter) -> Vec<&LogEntry> {
    self.ring.iter().filter(|e| filter.matches(e)).collect()
  }

  pub fn stats(&self) -> LogStats {
    let mut by_level = BTreeMap::new();
    for e in self.ring.iter() {
      *by_level.entry(e.level).or_default() += 1;
    }
    LogStats {
      retained: self.ring.len(),
      recorded: self.ring.recorded,
      by_level,
      listener_failures: self.ring.listener_failures,
    }
  }

  pub fn subscribe(&mut self, listener: impl Fn(&LogEntry) + Send + Sync + 'static) -> SubscriptionId {
    self.ring.subscribe(Box::new(listener))
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool { self.ring.unsubscribe(id) }

  pub fn len(&self) -> usize { self.ring.len() }

  pub fn is_empty(&self) -> bool { self.ring.len() == 0 }

  pub fn clear(&mut self) { self.ring.clear(); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filters_by_level_and_text() {
    let mut logs = LogRegistry::new(10);
    logs.log(LogLevel::Debug, "loaded 12 articles");
    logs.log(LogLevel::Warn, "Collection web declares 5 items");
    logs.record(LogEntry::new(LogLevel::Error, "integrity failed").with_context("errors", "2"));

    let loud = logs.filter(&LogFilter {
      min_level: Some(LogLevel::Warn),
      ..Default::default()
    });
    assert_eq!(loud.len(), 2);

    let text = logs.filter(&LogFilter {
      contains: Some("COLLECTION".to_string()),
      ..Default::default()
    });
    assert_eq!(text.len(), 1);

    let stats = logs.stats();
    assert_eq!(stats.by_level[&LogLevel::Debug], 1);
    assert_eq!(logs.recent(1)[0].context["errors"], "2");
  }

  #[test]
  fn entries_serialize_with_lowercase_level() {
    let entry = LogEntry::new(LogLevel::Info, "hello");
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["level"], "info");
    assert!(json["loggedAt"].is_string());
  }
}
