//! Sliding-window attempt limiter for form submissions.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
  /// Attempts allowed per identifier inside one window.
  pub max_attempts: usize,
  pub window_secs:  i64,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      window_secs:  3600,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
  Allowed { remaining: usize },
  Denied { retry_after: TimeDelta },
}

impl RateLimitDecision {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allowed { .. }) }
}

/// Per-identifier attempt history.
///
/// Identifiers (IP addresses, emails) are stored only as SHA-256 digests.
/// Every check prunes expired attempts across all identifiers and drops
/// identifiers left with no history. Methods take `&mut self`; wrap the
/// limiter in a mutex to share it.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
  config:  RateLimitConfig,
  history: HashMap<String, Vec<DateTime<Utc>>>,
}

impl RateLimiter {
  pub fn new(config: RateLimitConfig) -> Self {
    Self {
      config,
      history: HashMap::new(),
    }
  }

  pub fn check(&mut self, identifier: &str) -> RateLimitDecision {
    self.check_at(identifier, Utc::now())
  }

  /// Record an attempt at `now` unless the identifier is over its limit.
  /// Denied attempts are not recorded.
  pub fn check_at(&mut self, identifier: &str, now: DateTime<Utc>) -> RateLimitDecision {
    let window = TimeDelta::seconds(self.config.window_secs);
    self.history.retain(|_, attempts| {
      attempts.retain(|t| now - *t < window);
      !attempts.is_empty()
    });

    let key = digest(identifier);
    let recorded = self.history.get(&key).map_or(&[][..], Vec::as_slice);
    if recorded.len() >= self.config.max_attempts {
      let oldest = recorded.iter().min().copied().unwrap_or(now);
      let retry_after = (oldest + window - now).max(TimeDelta::zero());
      warn!(
        attempts = recorded.len(),
        retry_after_secs = retry_after.num_seconds(),
        "rate limit exceeded"
      );
      return RateLimitDecision::Denied { retry_after };
    }

    let attempts = self.history.entry(key).or_default();
    attempts.push(now);
    RateLimitDecision::Allowed {
      remaining: self.config.max_attempts - attempts.len(),
    }
  }

  /// Identifiers currently holding history.
  pub fn tracked(&self) -> usize { self.history.len() }

  pub fn clear(&mut self) { self.history.clear(); }
}

fn digest(identifier: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(identifier.as_bytes());
  hex::encode(hasher.finalize())
}
