//! Field readers used by the per-entity validators.
//!
//! A [`Fields`] wraps one JSON object and accumulates [`FieldError`]s as
//! fields are read. Every reader returns `None` (or a default) on failure so
//! validation always runs to completion and reports every broken rule.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::{
  content::Meta,
  dates::{parse_calendar_date, parse_datetime_strict},
  report::{ErrorCode, FieldError, Validated},
  slug::is_valid_slug,
};

pub(crate) struct Fields<'a> {
  obj:    &'a Map<String, Value>,
  prefix: String,
  errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
  /// Wrap a top-level record. Non-objects fail immediately.
  pub(crate) fn of(value: &'a Value, kind: &str) -> Result<Self, Vec<FieldError>> {
    match value.as_object() {
      Some(obj) => Ok(Self {
        obj,
        prefix: String::new(),
        errors: Vec::new(),
      }),
      None => Err(vec![FieldError::new(
        "",
        format!("{kind} must be a JSON object, found {}", type_name(value)),
        ErrorCode::InvalidType,
      )]),
    }
  }

  /// Read a nested object under `field`; its errors are folded back with
  /// [`Fields::absorb`].
  pub(crate) fn nested(&mut self, field: &str) -> Option<Fields<'a>> {
    let path = self.path(field);
    match self.raw(field)? {
      Value::Object(obj) => Some(Fields {
        obj,
        prefix: path,
        errors: Vec::new(),
      }),
      other => {
        let message = format!("{path} must be an object, found {}", type_name(other));
        self.errors.push(FieldError::new(path, message, ErrorCode::InvalidType));
        None
      }
    }
  }

  /// Build a reader for element `index` of the array at `field`.
  pub(crate) fn element(&mut self, field: &str, index: usize, value: &'a Value) -> Option<Fields<'a>> {
    let path = format!("{}[{index}]", self.path(field));
    match value {
      Value::Object(obj) => Some(Fields {
        obj,
        prefix: path,
        errors: Vec::new(),
      }),
      other => {
        let message = format!("{path} must be an object, found {}", type_name(other));
        self.errors.push(FieldError::new(path, message, ErrorCode::InvalidType));
        None
      }
    }
  }

  pub(crate) fn absorb(&mut self, child: Fields<'_>) {
    self.errors.extend(child.errors);
  }

  pub(crate) fn has(&self, field: &str) -> bool { self.raw(field).is_some() }

  pub(crate) fn fail(&mut self, field: &str, message: impl Into<String>, code: ErrorCode) {
    let path = self.path(field);
    self.errors.push(FieldError::new(path, message, code));
  }

  /// Finish validation: any accumulated error wins; otherwise `build` must
  /// assemble the record from the values read.
  pub(crate) fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Validated<T> {
    if !self.errors.is_empty() {
      return Validated::Invalid(self.errors);
    }
    match build() {
      Some(data) => Validated::Valid(data),
      None => Validated::Invalid(vec![FieldError::new(
        self.prefix,
        "record is missing required fields",
        ErrorCode::Required,
      )]),
    }
  }

  // ── Scalars ───────────────────────────────────────────────────────────

  pub(crate) fn required_str(
    &mut self,
    field: &str,
    label: &str,
    min: usize,
    max: usize,
  ) -> Option<String> {
    let Some(raw) = self.raw(field) else {
      self.fail(field, format!("{label} is required"), ErrorCode::Required);
      return None;
    };
    let Some(s) = raw.as_str() else {
      let found = type_name(raw);
      self.fail(field, format!("{label} must be a string, found {found}"), ErrorCode::InvalidType);
      return None;
    };
    self.check_len(field, label, s, min.max(1), max)
  }

  pub(crate) fn optional_str(&mut self, field: &str, label: &str, max: usize) -> Option<String> {
    let raw = self.raw(field)?;
    let Some(s) = raw.as_str() else {
      let found = type_name(raw);
      self.fail(field, format!("{label} must be a string, found {found}"), ErrorCode::InvalidType);
      return None;
    };
    self.check_len(field, label, s, 0, max)
  }

  fn check_len(&mut self, field: &str, label: &str, s: &str, min: usize, max: usize) -> Option<String> {
    let len = s.chars().count();
    if min > 0 && s.trim().is_empty() {
      self.fail(field, format!("{label} is required"), ErrorCode::Required);
      return None;
    }
    if len < min {
      self.fail(
        field,
        format!("{label} must be at least {min} characters"),
        ErrorCode::TooShort,
      );
      return None;
    }
    if len > max {
      self.fail(
        field,
        format!("{label} must be at most {max} characters"),
        ErrorCode::TooLong,
      );
      return None;
    }
    Some(s.to_string())
  }

  pub(crate) fn slug(&mut self, field: &str, label: &str) -> Option<String> {
    let s = self.required_str(field, label, 1, 100)?;
    self.check_slug(field, label, s)
  }

  pub(crate) fn optional_slug(&mut self, field: &str, label: &str) -> Option<String> {
    let s = self.optional_str(field, label, 100)?;
    self.check_slug(field, label, s)
  }

  fn check_slug(&mut self, field: &str, label: &str, s: String) -> Option<String> {
    if is_valid_slug(&s) {
      Some(s)
    } else {
      self.fail(
        field,
        format!("{label} must be lowercase kebab-case, got {s:?}"),
        ErrorCode::InvalidFormat,
      );
      None
    }
  }

  pub(crate) fn bool_or_false(&mut self, field: &str) -> bool {
    match self.raw(field) {
      None => false,
      Some(Value::Bool(b)) => *b,
      Some(other) => {
        let found = type_name(other);
        self.fail(field, format!("{field} must be a boolean, found {found}"), ErrorCode::InvalidType);
        false
      }
    }
  }

  pub(crate) fn enum_value<T>(&mut self, field: &str, label: &str) -> Option<T>
  where
    T: FromStr + IntoEnumIterator + Display,
  {
    let s = self.required_str(field, label, 1, 50)?;
    match T::from_str(&s) {
      Ok(v) => Some(v),
      Err(_) => {
        let allowed: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        self.fail(
          field,
          format!("{label} must be one of: {}; got {s:?}", allowed.join(", ")),
          ErrorCode::InvalidEnum,
        );
        None
      }
    }
  }

  pub(crate) fn non_negative_f64(&mut self, field: &str, label: &str) -> Option<f64> {
    let Some(raw) = self.raw(field) else {
      self.fail(field, format!("{label} is required"), ErrorCode::Required);
      return None;
    };
    let Some(n) = raw.as_f64() else {
      let found = type_name(raw);
      self.fail(field, format!("{label} must be a number, found {found}"), ErrorCode::InvalidType);
      return None;
    };
    if n < 0.0 {
      self.fail(field, format!("{label} must be non-negative"), ErrorCode::Negative);
      return None;
    }
    Some(n)
  }

  /// A required whole number `>= min`. Negative values get the dedicated
  /// `negative` code.
  pub(crate) fn count(&mut self, field: &str, label: &str, min: u32) -> Option<u32> {
    let Some(raw) = self.raw(field) else {
      self.fail(field, format!("{label} is required"), ErrorCode::Required);
      return None;
    };
    let Some(n) = raw.as_i64() else {
      let found = type_name(raw);
      self.fail(field, format!("{label} must be an integer, found {found}"), ErrorCode::InvalidType);
      return None;
    };
    if n < 0 {
      self.fail(field, format!("{label} must be non-negative"), ErrorCode::Negative);
      return None;
    }
    if n < i64::from(min) || n > i64::from(u32::MAX) {
      self.fail(field, format!("{label} must be at least {min}"), ErrorCode::OutOfRange);
      return None;
    }
    Some(n as u32)
  }

  pub(crate) fn int_or_zero(&mut self, field: &str, label: &str) -> i32 {
    match self.raw(field) {
      None => 0,
      Some(raw) => match raw.as_i64().and_then(|n| i32::try_from(n).ok()) {
        Some(n) => n,
        None => {
          self.fail(field, format!("{label} must be an integer"), ErrorCode::InvalidType);
          0
        }
      },
    }
  }

  pub(crate) fn optional_i64(&mut self, field: &str, label: &str) -> Option<i64> {
    let raw = self.raw(field)?;
    let n = raw.as_i64();
    if n.is_none() {
      self.fail(field, format!("{label} must be an integer"), ErrorCode::InvalidType);
    }
    n
  }

  // ── Dates ─────────────────────────────────────────────────────────────

  /// A strict RFC 3339 date-time; bare dates are rejected.
  pub(crate) fn datetime(&mut self, field: &str, label: &str, required: bool) -> Option<DateTime<Utc>> {
    let s = if required {
      self.required_str(field, label, 1, 64)?
    } else {
      self.optional_str(field, label, 64)?
    };
    let parsed = parse_datetime_strict(&s);
    if parsed.is_none() {
      self.fail(
        field,
        format!("{label} must be an ISO-8601 date-time (YYYY-MM-DDTHH:mm:ssZ), got {s:?}"),
        ErrorCode::InvalidDate,
      );
    }
    parsed
  }

  /// A calendar date given as `YYYY-MM-DD` or a full date-time.
  pub(crate) fn calendar_date(&mut self, field: &str, label: &str, required: bool) -> Option<NaiveDate> {
    let s = if required {
      self.required_str(field, label, 1, 64)?
    } else {
      self.optional_str(field, label, 64)?
    };
    let parsed = parse_calendar_date(&s);
    if parsed.is_none() {
      self.fail(
        field,
        format!("{label} must be an ISO-8601 date, got {s:?}"),
        ErrorCode::InvalidDate,
      );
    }
    parsed
  }

  // ── Collections ───────────────────────────────────────────────────────

  pub(crate) fn array(&mut self, field: &str) -> Option<&'a Vec<Value>> {
    match self.raw(field)? {
      Value::Array(items) => Some(items),
      other => {
        let found = type_name(other);
        self.fail(field, format!("{field} must be an array, found {found}"), ErrorCode::InvalidType);
        None
      }
    }
  }

  /// A list of non-empty strings; absent means empty.
  pub(crate) fn string_list(&mut self, field: &str) -> Vec<String> {
    let Some(items) = self.array(field) else {
      return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
      match item.as_str() {
        Some(s) if !s.trim().is_empty() => out.push(s.to_string()),
        _ => self.fail(
          &format!("{field}[{i}]"),
          format!("{field}[{i}] must be a non-empty string"),
          ErrorCode::InvalidType,
        ),
      }
    }
    out
  }

  pub(crate) fn slug_list(&mut self, field: &str) -> Vec<String> {
    let list = self.string_list(field);
    let mut out = Vec::with_capacity(list.len());
    for (i, s) in list.into_iter().enumerate() {
      if is_valid_slug(&s) {
        out.push(s);
      } else {
        self.fail(
          &format!("{field}[{i}]"),
          format!("{field}[{i}] must be lowercase kebab-case, got {s:?}"),
          ErrorCode::InvalidFormat,
        );
      }
    }
    out
  }

  /// The base metadata every record carries.
  pub(crate) fn meta(&mut self) -> Option<Meta> {
    let title = self.required_str("title", "Title", 1, 200);
    let description = self.optional_str("description", "Description", 500);
    let draft = self.bool_or_false("draft");
    let featured = self.bool_or_false("featured");
    let tags = self.string_list("tags");
    let created_at = self.datetime("createdAt", "Created at", false);
    let updated_at = self.datetime("updatedAt", "Updated at", false);
    Some(Meta {
      title: title?,
      description,
      draft,
      featured,
      tags,
      created_at,
      updated_at,
    })
  }

  // ── Internals ─────────────────────────────────────────────────────────

  fn path(&self, field: &str) -> String {
    if self.prefix.is_empty() {
      field.to_string()
    } else {
      format!("{}.{field}", self.prefix)
    }
  }

  /// The raw value for `field`; JSON `null` counts as absent.
  fn raw(&self, field: &str) -> Option<&'a Value> {
    let obj: &'a Map<String, Value> = self.obj;
    obj.get(field).filter(|v| !v.is_null())
  }
}

fn type_name(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
