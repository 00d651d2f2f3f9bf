use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::{
  kinds::Aggregatable,
  query::{Aggregated, Filters, Pagination, Sort},
  sort::compare,
};

/// Relatedness weights.
const SAME_GROUP: u32 = 10;
const SAME_PERSONA: u32 = 5;
const SAME_CATEGORY: u32 = 3;
const PER_SHARED_TAG: u32 = 1;

/// In-memory working set for one content type.
///
/// Drafts are dropped at construction and the rest are held in the type's
/// default order, which is also the tie-break for every later sort.
#[derive(Debug, Clone)]
pub struct Aggregator<T: Aggregatable> {
  items: Vec<T>,
}

/// A candidate from [`Aggregator::related`] with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Related<'a, T> {
  pub item:  &'a T,
  pub score: u32,
}

/// Tag and category counts over a working set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
  pub tags:       BTreeMap<String, usize>,
  pub categories: BTreeMap<String, usize>,
}

impl<T: Aggregatable> Aggregator<T> {
  pub fn new(items: impl IntoIterator<Item = T>) -> Self {
    Self::from_items(items.into_iter().filter(|i| !i.meta().draft).collect())
  }

  /// Like [`new`](Self::new) but keeps drafts, for previews.
  pub fn with_drafts(items: impl IntoIterator<Item = T>) -> Self {
    Self::from_items(items.into_iter().collect())
  }

  fn from_items(mut items: Vec<T>) -> Self {
    let sort = T::default_sort();
    items.sort_by(|a, b| {
      compare(&a.sort_value(sort.field), &b.sort_value(sort.field), sort.direction)
        .then_with(|| a.id().cmp(b.id()))
    });
    Self { items }
  }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn items(&self) -> &[T] { &self.items }

  pub fn get(&self, id: &str) -> Option<&T> { self.items.iter().find(|i| i.id() == id) }

  /// Filter, sort (default order when `sort` is `None`) and page. Pages past
  /// the end come back empty.
  pub fn aggregate(
    &self,
    filters: &Filters,
    sort: Option<Sort<T::SortField>>,
    pagination: Pagination,
  ) -> Aggregated<T, T::SortField> {
    let pagination = pagination.normalized();
    let sort = sort.unwrap_or_else(T::default_sort);

    let mut matched: Vec<&T> = self.items.iter().filter(|i| filters.matches(*i)).collect();
    matched.sort_by(|a, b| {
      compare(&a.sort_value(sort.field), &b.sort_value(sort.field), sort.direction)
    });

    let total = matched.len();
    let offset = pagination.offset();
    let items: Vec<T> = matched
      .into_iter()
      .skip(offset)
      .take(pagination.limit as usize)
      .cloned()
      .collect();
    debug!(
      total,
      page = pagination.page,
      returned = items.len(),
      "aggregated"
    );

    Aggregated {
      items,
      total,
      page: pagination.page,
      limit: pagination.limit,
      has_more: offset + (pagination.limit as usize) < total,
      filters: filters.clone(),
      sort,
    }
  }

  /// Up to `limit` other items ranked by shared group, persona, category
  /// and tags. Candidates with nothing in common are left out.
  pub fn related(&self, item: &T, limit: usize) -> Vec<Related<'_, T>> {
    let tags: HashSet<String> = item.meta().tags.iter().map(|t| t.to_lowercase()).collect();

    let mut scored: Vec<Related<'_, T>> = self
      .items
      .iter()
      .filter(|candidate| candidate.id() != item.id())
      .map(|candidate| {
        let mut score = 0;
        if candidate.group().is_some() && candidate.group() == item.group() {
          score += SAME_GROUP;
        }
        if candidate.persona() == item.persona() {
          score += SAME_PERSONA;
        }
        if candidate.category().is_some() && candidate.category() == item.category() {
          score += SAME_CATEGORY;
        }
        let shared = candidate
          .meta()
          .tags
          .iter()
          .filter(|t| tags.contains(&t.to_lowercase()))
          .count() as u32;
        score += shared * PER_SHARED_TAG;
        Related {
          item: candidate,
          score,
        }
      })
      .filter(|r| r.score > 0)
      .collect();

    // Stable: equal scores keep the default order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
  }

  pub fn facets(&self) -> Facets {
    let mut facets = Facets::default();
    for item in &self.items {
      for tag in &item.meta().tags {
        *facets.tags.entry(tag.clone()).or_default() += 1;
      }
      if let Some(category) = item.category() {
        *facets.categories.entry(category.to_string()).or_default() += 1;
      }
    }
    facets
  }
}
