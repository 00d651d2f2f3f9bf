//! Derived-content pipeline for Folio articles.
//!
//! Everything here is a pure function of markdown text: reading time,
//! excerpts, headings and table of contents, keywords, readability and a
//! markdown lint. [`derive`] bundles them for one [`BlogArticle`].
//!
//! # Quick start
//!
//! ```no_run
//! use folio_content::{ReadingTimeOptions, format_reading_time, reading_time};
//!
//! let t = reading_time("# Hello\nA short post.", &ReadingTimeOptions::default());
//! println!("{}", format_reading_time(t.minutes));
//! ```

pub mod excerpt;
pub mod keywords;
pub mod markdown;
pub mod readability;
pub mod reading;
pub mod text;
pub mod toc;

pub use excerpt::{ExcerptOptions, generate_excerpt};
use folio_core::{Report, content::BlogArticle};
pub use keywords::{Keyword, extract_keywords};
pub use markdown::{strip_front_matter, strip_markdown, validate_markdown};
pub use readability::{Difficulty, Readability, readability};
pub use reading::{
  ReadingSpeed, ReadingTime, ReadingTimeOptions, format_reading_time, reading_time,
};
use serde::Serialize;
pub use toc::{Heading, TocEntry, build_toc, extract_headings};

// ─── Public types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DeriveOptions {
  pub reading:      ReadingTimeOptions,
  pub excerpt:      ExcerptOptions,
  pub max_keywords: usize,
}

impl Default for DeriveOptions {
  fn default() -> Self {
    Self {
      reading:      ReadingTimeOptions::default(),
      excerpt:      ExcerptOptions::default(),
      max_keywords: 10,
    }
  }
}

/// Every computed field for one article.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedContent {
  pub slug:               String,
  pub reading_time:       ReadingTime,
  pub reading_time_label: String,
  pub excerpt:            String,
  pub toc:                Vec<TocEntry>,
  pub keywords:           Vec<Keyword>,
  pub readability:        Option<Readability>,
  pub markdown:           Report,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Run the whole pipeline over `article`. An article without a body still
/// gets its author excerpt and a one-minute reading time.
pub fn derive(article: &BlogArticle, options: &DeriveOptions) -> DerivedContent {
  let body = article.content.as_deref().unwrap_or_default();
  tracing::debug!(slug = %article.slug, bytes = body.len(), "deriving article content");

  let reading_time = reading_time(body, &options.reading);
  DerivedContent {
    slug: article.slug.clone(),
    reading_time_label: format_reading_time(reading_time.minutes),
    reading_time,
    excerpt: generate_excerpt(body, article.excerpt.as_deref(), &options.excerpt),
    toc: build_toc(&extract_headings(body)),
    keywords: extract_keywords(body, options.max_keywords),
    readability: readability(body),
    markdown: validate_markdown(body),
  }
}
