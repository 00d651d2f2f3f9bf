//! Heuristic spam scoring.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DOLLAR_AMOUNT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$\s?\d[\d,]*(?:\.\d+)?").expect("dollar regex"));
static URL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\bhttps?://|\bwww\.").expect("url regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamConfig {
  /// Scores at or above this flag the submission.
  pub threshold:          u32,
  /// Case-insensitive phrases worth two points each.
  pub phrases:            Vec<String>,
  pub disposable_domains: Vec<String>,
  pub max_dollar_amounts: usize,
  pub max_urls:           usize,
  pub max_caps_words:     usize,
}

impl Default for SpamConfig {
  fn default() -> Self {
    let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
    Self {
      threshold:          3,
      phrases:            owned(&[
        "viagra",
        "casino",
        "crypto investment",
        "make money fast",
        "click here",
        "buy now",
        "limited time offer",
        "act now",
        "100% free",
        "work from home",
        "seo services",
        "guaranteed ranking",
      ]),
      disposable_domains: owned(&[
        "mailinator.com",
        "guerrillamail.com",
        "10minutemail.com",
        "tempmail.com",
        "temp-mail.org",
        "yopmail.com",
        "throwawaymail.com",
        "trashmail.com",
        "sharklasers.com",
        "getnada.com",
      ]),
      max_dollar_amounts: 2,
      max_urls:           2,
      max_caps_words:     3,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamScore {
  pub score:   u32,
  pub is_spam: bool,
  /// One entry per rule that fired.
  pub reasons: Vec<String>,
}

/// The text fields scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpamInput<'a> {
  pub name:    &'a str,
  pub email:   &'a str,
  pub subject: &'a str,
  pub message: &'a str,
}

pub fn score_spam(input: &SpamInput<'_>, config: &SpamConfig) -> SpamScore {
  let mut score = 0;
  let mut reasons = Vec::new();
  let mut add = |points: u32, reason: String| {
    score += points;
    reasons.push(reason);
  };

  let body = format!("{}\n{}", input.subject, input.message);
  let lower = body.to_lowercase();

  for phrase in &config.phrases {
    if lower.contains(&phrase.to_lowercase()) {
      add(2, format!("contains spam phrase \"{phrase}\""));
    }
  }

  let dollars = DOLLAR_AMOUNT.find_iter(&body).count();
  if dollars > config.max_dollar_amounts {
    add(1, format!("{dollars} dollar amounts"));
  }

  let urls = URL.find_iter(&body).count();
  if urls > config.max_urls {
    add(2, format!("{urls} links"));
  }

  let caps = body.split_whitespace().filter(|w| is_shouting(w)).count();
  if caps > config.max_caps_words {
    add(1, format!("{caps} all-caps words"));
  }

  if let Some((_, domain)) = input.email.rsplit_once('@') {
    let domain = domain.trim().to_lowercase();
    if config.disposable_domains.iter().any(|d| *d == domain) {
      add(2, format!("disposable email domain {domain}"));
    }
  }

  if input.name.trim().chars().count() < 3 && input.message.chars().count() > 1000 {
    add(1, "very short name with a very long message".to_string());
  }

  SpamScore {
    score,
    is_spam: score >= config.threshold,
    reasons,
  }
}

/// At least four letters, all upper case.
fn is_shouting(word: &str) -> bool {
  let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
  letters.len() >= 4 && letters.iter().all(|c| c.is_uppercase())
}
