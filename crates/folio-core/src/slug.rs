//! Slug format checks and normalisation.

use std::sync::LazyLock;

use regex::Regex;

static SLUG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex"));

/// Whether `s` is lowercase kebab-case (`^[a-z0-9]+(-[a-z0-9]+)*$`).
pub fn is_valid_slug(s: &str) -> bool { SLUG.is_match(s) }

/// Turn arbitrary text into a URL-safe slug.
///
/// Lowercases and keeps ASCII letters and digits. Whitespace, hyphens and
/// underscores separate words: each run becomes one hyphen, never leading or
/// trailing. Anything else is dropped. The result may be empty.
pub fn normalize_slug(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut pending_hyphen = false;

  for c in text.chars().flat_map(char::to_lowercase) {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !out.is_empty() {
        out.push('-');
      }
      pending_hyphen = false;
      out.push(c);
    } else if c.is_whitespace() || c == '-' || c == '_' {
      pending_hyphen = true;
    }
  }
  out
}
