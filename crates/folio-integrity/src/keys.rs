use std::collections::BTreeMap;

use folio_core::{Report, content::ContentKind, snapshot::ContentSnapshot};

/// Keys and slugs must identify exactly one record of their kind. Portfolio
/// item slugs only need to be unique within their collection.
pub fn validate_unique_keys(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();

  duplicates(
    &mut report,
    ContentKind::Persona,
    "key",
    snapshot.personas.iter().map(|p| p.key.as_str()),
  );
  duplicates(
    &mut report,
    ContentKind::Skill,
    "key",
    snapshot.skills.iter().map(|s| s.key.as_str()),
  );
  duplicates(
    &mut report,
    ContentKind::BlogArticle,
    "slug",
    snapshot.articles.iter().map(|a| a.slug.as_str()),
  );
  duplicates(
    &mut report,
    ContentKind::PortfolioCollection,
    "key",
    snapshot.collections.iter().map(|c| c.key.as_str()),
  );
  duplicates(
    &mut report,
    ContentKind::ResumeEntry,
    "slug",
    snapshot.resume.iter().map(|r| r.slug.as_str()),
  );

  let mut items: BTreeMap<(&str, &str), usize> = BTreeMap::new();
  for item in &snapshot.items {
    *items
      .entry((item.collection.as_str(), item.slug.as_str()))
      .or_default() += 1;
  }
  for ((collection, slug), n) in items {
    if n > 1 {
      report.error(format!(
        "{} `{slug}`: slug is used by {n} items in collection `{collection}`",
        ContentKind::PortfolioItem
      ));
    }
  }
  report
}

fn duplicates<'a>(
  report: &mut Report,
  kind: ContentKind,
  field: &str,
  ids: impl Iterator<Item = &'a str>,
) {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for id in ids {
    *counts.entry(id).or_default() += 1;
  }
  for (id, n) in counts {
    if n > 1 {
      report.error(format!("{kind} `{id}`: {field} is used by {n} records"));
    }
  }
}
