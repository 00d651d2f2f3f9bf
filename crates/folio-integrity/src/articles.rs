use std::collections::{BTreeMap, BTreeSet};

use folio_core::{
  Report,
  content::{BlogArticle, ContentKind},
  snapshot::ContentSnapshot,
};

/// Series membership.
///
/// Within one series name: two articles claiming the same part is an error;
/// a missing part in `1..=total`, a `total` that disagrees with the highest
/// part, or articles disagreeing on `total` are warnings.
pub fn validate_series_references(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();

  let mut series: BTreeMap<&str, Vec<&BlogArticle>> = BTreeMap::new();
  for article in &snapshot.articles {
    if let Some(s) = &article.series {
      series.entry(s.name.as_str()).or_default().push(article);
    }
  }

  for (name, members) in series {
    let mut parts: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    let mut totals: BTreeSet<u32> = BTreeSet::new();
    for article in &members {
      if let Some(s) = &article.series {
        parts.entry(s.part).or_default().push(article.slug.as_str());
        totals.insert(s.total);
      }
    }

    for (part, slugs) in &parts {
      if slugs.len() > 1 {
        report.error(format!(
          "series `{name}`: duplicate part {part} claimed by {} `{}`",
          ContentKind::BlogArticle,
          slugs.join("`, `")
        ));
      }
    }

    if totals.len() > 1 {
      let listed: Vec<String> = totals.iter().map(u32::to_string).collect();
      report.warn(format!(
        "series `{name}`: articles disagree on total ({})",
        listed.join(", ")
      ));
    }

    let total = totals.last().copied().unwrap_or(0);
    let highest = parts.keys().last().copied().unwrap_or(0);
    if total != highest {
      report.warn(format!(
        "series `{name}`: total declares {total} but the highest part is {highest}"
      ));
    }
    for part in 1..=total {
      if !parts.contains_key(&part) {
        report.warn(format!("series `{name}`: part {part} of {total} is missing"));
      }
    }
  }
  report
}

/// Related-article slugs should name a published article other than the one
/// declaring them.
pub fn validate_related_articles(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let kind = ContentKind::BlogArticle;

  for article in &snapshot.articles {
    for related in &article.related_articles {
      if *related == article.slug {
        report.warn(format!(
          "{kind} `{}`: relatedArticles lists the article itself",
          article.slug
        ));
        continue;
      }
      match snapshot.article(related) {
        None => report.warn(format!(
          "{kind} `{}`: relatedArticles references unknown article `{related}`",
          article.slug
        )),
        Some(target) if target.meta.draft => report.warn(format!(
          "{kind} `{}`: relatedArticles references draft article `{related}`",
          article.slug
        )),
        Some(_) => {}
      }
    }
  }
  report
}
