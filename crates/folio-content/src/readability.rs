//! Flesch readability scoring.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  markdown::{split_code, strip_front_matter, strip_markdown},
  text::{collapse_whitespace, split_sentences},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Difficulty {
  VeryEasy,
  Easy,
  FairlyEasy,
  Standard,
  FairlyDifficult,
  Difficult,
  VeryDifficult,
}

impl Difficulty {
  fn from_ease(ease: f64) -> Self {
    match ease {
      e if e >= 90.0 => Self::VeryEasy,
      e if e >= 80.0 => Self::Easy,
      e if e >= 70.0 => Self::FairlyEasy,
      e if e >= 60.0 => Self::Standard,
      e if e >= 50.0 => Self::FairlyDifficult,
      e if e >= 30.0 => Self::Difficult,
      _ => Self::VeryDifficult,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readability {
  pub words:       usize,
  pub sentences:   usize,
  pub syllables:   usize,
  /// Flesch reading ease, clamped to 0..=100.
  pub ease:        f64,
  /// Flesch–Kincaid grade level, never negative.
  pub grade_level: f64,
  pub difficulty:  Difficulty,
}

/// Score the prose of `markdown`. `None` when there is nothing to read.
pub fn readability(markdown: &str) -> Option<Readability> {
  let (prose, _) = split_code(strip_front_matter(markdown));
  let text = collapse_whitespace(&strip_markdown(&prose));

  let words: Vec<&str> = text
    .split_whitespace()
    .filter(|t| t.chars().any(char::is_alphabetic))
    .collect();
  if words.is_empty() {
    return None;
  }
  let sentences = split_sentences(&text).len().max(1);
  let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

  let wps = words.len() as f64 / sentences as f64;
  let spw = syllables as f64 / words.len() as f64;
  let ease = (206.835 - 1.015 * wps - 84.6 * spw).clamp(0.0, 100.0);
  let grade_level = (0.39 * wps + 11.8 * spw - 15.59).max(0.0);

  Some(Readability {
    words: words.len(),
    sentences,
    syllables,
    ease,
    grade_level,
    difficulty: Difficulty::from_ease(ease),
  })
}

/// Vowel-group heuristic: each run of vowels is a syllable, a trailing
/// silent `e` is dropped, and every word has at least one.
pub fn count_syllables(word: &str) -> usize {
  let letters: Vec<char> = word
    .chars()
    .filter(char::is_ascii_alphabetic)
    .map(|c| c.to_ascii_lowercase())
    .collect();
  if letters.is_empty() {
    return 0;
  }
  if letters.len() <= 3 {
    return 1;
  }

  let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
  let mut count = 0;
  let mut previous_vowel = false;
  for &c in &letters {
    let vowel = is_vowel(c);
    if vowel && !previous_vowel {
      count += 1;
    }
    previous_vowel = vowel;
  }

  let n = letters.len();
  let silent_e = letters[n - 1] == 'e' && !(letters[n - 2] == 'l' && !is_vowel(letters[n - 3]));
  if silent_e && count > 1 {
    count -= 1;
  }
  count.max(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn syllable_heuristic() {
    assert_eq!(count_syllables("cat"), 1);
    assert_eq!(count_syllables("make"), 1);
    assert_eq!(count_syllables("table"), 2);
    assert_eq!(count_syllables("reading"), 2);
    assert_eq!(count_syllables("beautiful"), 3);
    assert_eq!(count_syllables("42"), 0);
  }

  #[test]
  fn simple_prose_is_easy() {
    let r = readability("The cat sat on the mat. The dog ran to the park.").unwrap();
    assert_eq!(r.words, 12);
    assert_eq!(r.sentences, 2);
    assert!(r.ease >= 90.0);
    assert_eq!(r.difficulty, Difficulty::VeryEasy);
  }

  #[test]
  fn dense_prose_scores_lower() {
    let easy = readability("We ran. We sat. We ate.").unwrap();
    let hard = readability(
      "Comprehensive internationalization considerations necessitate architectural \
       reorganization of administrative infrastructure.",
    )
    .unwrap();
    assert!(hard.ease < easy.ease);
    assert!(hard.grade_level > easy.grade_level);
    assert_eq!(hard.difficulty, Difficulty::VeryDifficult);
  }

  #[test]
  fn empty_content_has_no_score() {
    assert!(readability("").is_none());
    assert!(readability("```\ncode only\n```").is_none());
  }
}
