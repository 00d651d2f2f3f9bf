//! Validation result shapes shared by every checker.
//!
//! Per-record checks return [`Validated`], which serialises as
//! `{"success": bool, "data"?: T, "errors": [...]}`. Graph-wide and composite
//! checks return [`Report`] (`{"valid", "errors", "warnings"}`). Warnings never
//! make a report invalid.

use serde::{Deserialize, Serialize, ser::SerializeStruct};
use strum::{AsRefStr, Display};

// ─── Field errors ────────────────────────────────────────────────────────────

/// Machine-readable class of a [`FieldError`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
  Required,
  TooShort,
  TooLong,
  InvalidType,
  InvalidEnum,
  InvalidFormat,
  InvalidDate,
  Negative,
  OutOfRange,
  Refinement,
}

/// A single failed rule on a single field. `field` is a dotted path such as
/// `series.part` or `images[0].src`; the empty string means the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code:    Option<ErrorCode>,
}

impl FieldError {
  pub fn new(
    field: impl Into<String>,
    message: impl Into<String>,
    code: ErrorCode,
  ) -> Self {
    Self {
      field:   field.into(),
      message: message.into(),
      code:    Some(code),
    }
  }
}

// ─── Per-record result ───────────────────────────────────────────────────────

/// The outcome of validating one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
  Valid(T),
  Invalid(Vec<FieldError>),
}

impl<T> Validated<T> {
  pub fn is_valid(&self) -> bool { matches!(self, Self::Valid(_)) }

  pub fn data(&self) -> Option<&T> {
    match self {
      Self::Valid(data) => Some(data),
      Self::Invalid(_) => None,
    }
  }

  pub fn errors(&self) -> &[FieldError] {
    match self {
      Self::Valid(_) => &[],
      Self::Invalid(errors) => errors,
    }
  }

  pub fn into_result(self) -> Result<T, Vec<FieldError>> {
    match self {
      Self::Valid(data) => Ok(data),
      Self::Invalid(errors) => Err(errors),
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
    match self {
      Self::Valid(data) => Validated::Valid(f(data)),
      Self::Invalid(errors) => Validated::Invalid(errors),
    }
  }
}

impl<T: Serialize> Serialize for Validated<T> {
  fn serialize<S: serde::Serializer>(
    &self,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match self {
      Self::Valid(data) => {
        let mut s = serializer.serialize_struct("Validated", 3)?;
        s.serialize_field("success", &true)?;
        s.serialize_field("data", data)?;
        s.serialize_field("errors", &[] as &[FieldError])?;
        s.end()
      }
      Self::Invalid(errors) => {
        let mut s = serializer.serialize_struct("Validated", 2)?;
        s.serialize_field("success", &false)?;
        s.serialize_field("errors", errors)?;
        s.end()
      }
    }
  }
}

// ─── Composite report ────────────────────────────────────────────────────────

/// Errors and warnings from a graph-wide or multi-stage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
  pub valid:    bool,
  pub errors:   Vec<String>,
  pub warnings: Vec<String>,
}

impl Default for Report {
  fn default() -> Self { Self::new() }
}

impl Report {
  pub fn new() -> Self {
    Self {
      valid:    true,
      errors:   Vec::new(),
      warnings: Vec::new(),
    }
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.errors.push(message.into());
    self.valid = false;
  }

  pub fn warn(&mut self, message: impl Into<String>) {
    self.warnings.push(message.into());
  }

  /// Fold `other` into `self`, keeping message order.
  pub fn merge(&mut self, other: Report) {
    self.errors.extend(other.errors);
    self.warnings.extend(other.warnings);
    self.valid = self.errors.is_empty();
  }

  pub fn merged(mut self, other: Report) -> Self {
    self.merge(other);
    self
  }

  pub fn is_clean(&self) -> bool {
    self.errors.is_empty() && self.warnings.is_empty()
  }
}

impl FromIterator<Report> for Report {
  fn from_iter<I: IntoIterator<Item = Report>>(iter: I) -> Self {
    iter.into_iter().fold(Report::new(), Report::merged)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn warnings_do_not_invalidate() {
    let mut r = Report::new();
    r.warn("collection web declares 5 items");
    assert!(r.valid);
    r.error("persona missing");
    assert!(!r.valid);
  }

  #[test]
  fn merge_recomputes_validity() {
    let mut a = Report::new();
    a.warn("w1");
    let mut b = Report::new();
    b.error("e1");
    let merged: Report = vec![a, b].into_iter().collect();
    assert!(!merged.valid);
    assert_eq!(merged.errors, vec!["e1"]);
    assert_eq!(merged.warnings, vec!["w1"]);
  }

  #[test]
  fn validated_serialises_as_tagged_shape() {
    let ok: Validated<u32> = Validated::Valid(7);
    assert_eq!(
      serde_json::to_value(&ok).unwrap(),
      serde_json::json!({ "success": true, "data": 7, "errors": [] })
    );

    let bad: Validated<u32> = Validated::Invalid(vec![FieldError::new(
      "name",
      "Name is required",
      ErrorCode::Required,
    )]);
    assert_eq!(
      serde_json::to_value(&bad).unwrap(),
      serde_json::json!({
        "success": false,
        "errors": [{ "field": "name", "message": "Name is required", "code": "required" }]
      })
    );
  }
}
