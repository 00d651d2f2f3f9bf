use std::collections::HashMap;

use folio_core::{
  Report,
  content::{ContentKind, PortfolioCollection},
  snapshot::ContentSnapshot,
};

/// Items must belong to an existing collection, and should share its
/// persona.
pub fn validate_portfolio_references(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let collections: HashMap<&str, &PortfolioCollection> = snapshot
    .collections
    .iter()
    .map(|c| (c.key.as_str(), c))
    .collect();

  for item in &snapshot.items {
    let kind = ContentKind::PortfolioItem;
    let Some(collection) = collections.get(item.collection.as_str()) else {
      report.error(format!(
        "{kind} `{}`: collection references unknown collection `{}`",
        item.slug, item.collection
      ));
      continue;
    };
    if collection.persona != item.persona {
      report.warn(format!(
        "{kind} `{}`: persona `{}` differs from collection `{}` persona `{}`",
        item.slug, item.persona, collection.key, collection.persona
      ));
    }
    if collection.meta.draft && !item.meta.draft {
      report.warn(format!(
        "{kind} `{}`: collection `{}` is a draft",
        item.slug, collection.key
      ));
    }
  }
  report
}

/// A collection's declared `itemCount` should match its published items.
pub fn validate_collection_item_counts(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let mut actual: HashMap<&str, u32> = HashMap::new();
  for item in snapshot.items.iter().filter(|i| !i.meta.draft) {
    *actual.entry(item.collection.as_str()).or_default() += 1;
  }

  for collection in &snapshot.collections {
    let found = actual.get(collection.key.as_str()).copied().unwrap_or(0);
    if found != collection.item_count {
      report.warn(format!(
        "{} `{}`: itemCount declares {} but {found} published items reference it",
        ContentKind::PortfolioCollection,
        collection.key,
        collection.item_count
      ));
    }
  }
  report
}
