//! The contact-form pipeline.

use chrono::{DateTime, TimeDelta, Utc};
use folio_core::{Report, schema::validate_contact_submission};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
  sanitize::{sanitize_html, sanitize_text, strip_dangerous},
  spam::{SpamConfig, SpamInput, SpamScore, score_spam},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
  /// Submissions faster than this after render are treated as automated.
  pub min_dwell_secs:         i64,
  /// Submissions older than this are stale.
  pub max_age_secs:           i64,
  /// Keep markdown in the message: dangerous markup is still stripped but
  /// the rest is not entity-escaped.
  pub allow_markdown_message: bool,
  pub spam:                   SpamConfig,
}

impl Default for FormConfig {
  fn default() -> Self {
    Self {
      min_dwell_secs:         3,
      max_age_secs:           24 * 60 * 60,
      allow_markdown_message: false,
      spam:                   SpamConfig::default(),
    }
  }
}

/// Sanitized copies of the free-text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedSubmission {
  pub name:    String,
  pub email:   String,
  pub subject: Option<String>,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormVerdict {
  pub valid:        bool,
  pub errors:       Vec<String>,
  pub warnings:     Vec<String>,
  /// Honeypot filled or submitted faster than a human could.
  pub bot_detected: bool,
  /// Advisory; spam never makes a verdict invalid on its own.
  pub spam:         SpamScore,
  pub sanitized:    SanitizedSubmission,
}

/// Runs schema, honeypot, timing, sanitization and spam stages over a raw
/// submission. Every stage runs even when an earlier one fails.
#[derive(Debug, Clone, Default)]
pub struct ContactFormValidator {
  config: FormConfig,
}

impl ContactFormValidator {
  pub fn new(config: FormConfig) -> Self { Self { config } }

  pub fn config(&self) -> &FormConfig { &self.config }

  pub fn validate_submission(&self, raw: &Value) -> FormVerdict {
    self.validate_submission_at(raw, Utc::now())
  }

  pub fn validate_submission_at(&self, raw: &Value, now: DateTime<Utc>) -> FormVerdict {
    let mut report = Report::new();
    let field = |name: &str| raw.get(name).and_then(Value::as_str).unwrap_or_default();

    // Schema.
    for e in validate_contact_submission(raw).errors() {
      if e.field.is_empty() {
        report.error(e.message.clone());
      } else {
        report.error(format!("{}: {}", e.field, e.message));
      }
    }

    // Honeypot.
    let mut bot_detected = false;
    if !field("honeypot").trim().is_empty() {
      bot_detected = true;
      report.error("Bot detection: Honeypot field must be empty");
    }

    // Timing.
    match raw.get("timestamp").and_then(Value::as_i64) {
      None => report.warn("Submission timestamp missing; timing check skipped"),
      Some(rendered_ms) => match now
        .timestamp_millis()
        .checked_sub(rendered_ms)
        .and_then(TimeDelta::try_milliseconds)
        .filter(|elapsed| *elapsed >= TimeDelta::zero())
      {
        None => report.error(format!(
          "Invalid timestamp: {rendered_ms} is not a render time in the past"
        )),
        Some(elapsed) if elapsed < TimeDelta::seconds(self.config.min_dwell_secs) => {
          bot_detected = true;
          report.error(format!(
            "Bot detection: form submitted {}ms after render, minimum is {}s",
            elapsed.num_milliseconds(),
            self.config.min_dwell_secs
          ));
        }
        Some(elapsed) if elapsed > TimeDelta::seconds(self.config.max_age_secs) => {
          report.error(format!(
            "Form expired: rendered {}h ago, reload and try again",
            elapsed.num_hours()
          ));
        }
        Some(_) => {}
      },
    }

    // Sanitization.
    let subject = raw
      .get("subject")
      .and_then(Value::as_str)
      .map(sanitize_text)
      .filter(|s| !s.is_empty());
    let message = if self.config.allow_markdown_message {
      strip_dangerous(field("message"))
    } else {
      sanitize_html(field("message"))
    };
    let sanitized = SanitizedSubmission {
      name: sanitize_text(field("name")),
      email: sanitize_text(field("email")),
      subject,
      message,
    };

    // Spam.
    let spam = score_spam(
      &SpamInput {
        name:    field("name"),
        email:   field("email"),
        subject: field("subject"),
        message: field("message"),
      },
      &self.config.spam,
    );
    if spam.is_spam {
      report.warn(format!(
        "Submission flagged as likely spam (score {}): {}",
        spam.score,
        spam.reasons.join("; ")
      ));
    }

    if bot_detected {
      warn!("contact submission rejected by bot detection");
    }
    debug!(
      valid = report.valid,
      errors = report.errors.len(),
      spam_score = spam.score,
      "contact submission validated"
    );

    FormVerdict {
      valid: report.valid,
      errors: report.errors,
      warnings: report.warnings,
      bot_detected,
      spam,
      sanitized,
    }
  }
}
