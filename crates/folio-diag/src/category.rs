//! Error taxonomy.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
pub enum ErrorCategory {
  /// Schema or cross-reference failure; fixed by correcting the content.
  Validation,
  /// Referenced content does not exist.
  Content,
  /// Contact-form pipeline failure.
  Form,
  /// A downstream collaborator (delivery adapter) failed.
  External,
  /// Anything unexpected.
  System,
}

impl ErrorCategory {
  pub fn retryable(self) -> bool {
    match self {
      Self::Validation | Self::Form | Self::External => true,
      Self::Content | Self::System => false,
    }
  }

  pub fn default_severity(self) -> Severity {
    match self {
      Self::Validation | Self::Form => Severity::Low,
      Self::Content | Self::External => Severity::Medium,
      Self::System => Severity::High,
    }
  }
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
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
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
pub enum LogLevel {
  Debug,
  Info,
  Warn,
  Error,
}
