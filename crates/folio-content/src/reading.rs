//! Reading-time estimation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  markdown::{split_code, strip_front_matter, strip_markdown},
  text::count_words,
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadingSpeed {
  Slow,
  #[default]
  Average,
  Fast,
}

impl ReadingSpeed {
  pub fn words_per_minute(self) -> u32 {
    match self {
      Self::Slow => 150,
      Self::Average => 200,
      Self::Fast => 250,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingTimeOptions {
  pub speed:        ReadingSpeed,
  /// Count words inside fenced code blocks.
  pub include_code: bool,
  /// Weight applied to code words when they are counted.
  pub code_weight:  f64,
}

impl Default for ReadingTimeOptions {
  fn default() -> Self {
    Self {
      speed:        ReadingSpeed::Average,
      include_code: true,
      code_weight:  0.5,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTime {
  /// Whole minutes, rounded up, never below 1.
  pub minutes:    u32,
  /// Prose words after markdown syntax is stripped.
  pub words:      usize,
  /// Words inside fenced code (0 when code is excluded).
  pub code_words: usize,
}

pub fn reading_time(markdown: &str, options: &ReadingTimeOptions) -> ReadingTime {
  let body = strip_front_matter(markdown);
  let (prose, code) = split_code(body);
  let words = count_words(&strip_markdown(&prose));
  let code_words = if options.include_code {
    count_words(&code)
  } else {
    0
  };

  let weighted = words as f64 + code_words as f64 * options.code_weight;
  let wpm = f64::from(options.speed.words_per_minute());
  let minutes = ((weighted / wpm).ceil() as u32).max(1);

  ReadingTime {
    minutes,
    words,
    code_words,
  }
}

/// `"Less than a minute"`, `"1 minute read"`, `"1 hour 5 minutes read"`.
pub fn format_reading_time(minutes: u32) -> String {
  if minutes == 0 {
    return "Less than a minute".to_string();
  }
  let unit = |n: u32, word: &str| {
    if n == 1 {
      format!("1 {word}")
    } else {
      format!("{n} {word}s")
    }
  };

  let hours = minutes / 60;
  let rest = minutes % 60;
  match (hours, rest) {
    (0, m) => format!("{} read", unit(m, "minute")),
    (h, 0) => format!("{} read", unit(h, "hour")),
    (h, m) => format!("{} {} read", unit(h, "hour"), unit(m, "minute")),
  }
}
