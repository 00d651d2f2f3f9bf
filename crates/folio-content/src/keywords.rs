//! Keyword extraction by weighted term frequency.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::markdown::{split_code, strip_front_matter, strip_markdown};

const MIN_WORD_LEN: usize = 3;
const LONG_WORD_LEN: usize = 6;
const LONG_WORD_BONUS: f64 = 0.5;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
  [
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "him", "his", "how", "its", "may", "new", "now", "old", "see",
    "two", "way", "who", "did", "get", "let", "say", "she", "too", "use", "that", "with",
    "have", "this", "will", "your", "from", "they", "been", "more", "when", "what", "were",
    "there", "their", "which", "would", "about", "into", "than", "then", "them", "these",
    "those", "some", "such", "only", "also", "just", "like", "over", "very", "each", "other",
    "could", "should", "because", "where", "while", "after", "before", "being", "does", "doing",
    "here", "most", "much", "many", "make", "made", "well", "even", "both", "same", "through",
  ]
  .into_iter()
  .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
  pub word:  String,
  pub count: usize,
  /// `count`, plus a bonus per occurrence for words longer than six letters.
  pub score: f64,
}

/// The `max` highest-scoring terms in `markdown`. Code, stopwords, short
/// words and numbers are ignored; ties break on count, then alphabetically.
pub fn extract_keywords(markdown: &str, max: usize) -> Vec<Keyword> {
  let (prose, _) = split_code(strip_front_matter(markdown));
  let text = strip_markdown(&prose).to_lowercase();

  let mut counts: HashMap<String, usize> = HashMap::new();
  for token in text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-')) {
    let word = token.trim_matches(|c: char| c == '\'' || c == '-');
    if word.chars().count() < MIN_WORD_LEN
      || word.chars().all(|c| c.is_ascii_digit())
      || STOPWORDS.contains(word)
    {
      continue;
    }
    *counts.entry(word.to_string()).or_insert(0) += 1;
  }

  let mut keywords: Vec<Keyword> = counts
    .into_iter()
    .map(|(word, count)| {
      let bonus = if word.chars().count() > LONG_WORD_LEN {
        LONG_WORD_BONUS * count as f64
      } else {
        0.0
      };
      Keyword {
        score: count as f64 + bonus,
        word,
        count,
      }
    })
    .collect();

  keywords.sort_by(|a, b| {
    b.score
      .total_cmp(&a.score)
      .then(b.count.cmp(&a.count))
      .then_with(|| a.word.cmp(&b.word))
  });
  keywords.truncate(max);
  keywords
}
