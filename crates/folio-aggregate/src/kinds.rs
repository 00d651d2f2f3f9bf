//! Per-type accessors: sort fields, dates, searchable text.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use folio_core::content::{
  BlogArticle, Meta, PortfolioCollection, PortfolioItem, ResumeEntry, Skill,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{query::Sort, sort::SortValue};

/// A content type the [`Aggregator`](crate::Aggregator) can filter, sort and
/// page.
pub trait Aggregatable: Clone {
  /// Closed set of fields this type sorts by.
  type SortField: Copy + Debug + PartialEq + Serialize;

  fn default_sort() -> Sort<Self::SortField>;

  fn id(&self) -> &str;
  fn meta(&self) -> &Meta;
  fn persona(&self) -> &str;
  fn category(&self) -> Option<&str>;
  /// The date filtered on by `date_from`/`date_to`.
  fn date(&self) -> Option<DateTime<Utc>>;
  /// Collection key or series name; the strongest relatedness signal.
  fn group(&self) -> Option<&str> { None }
  /// Fields searched by the free-text filter, besides tags.
  fn search_fields(&self) -> Vec<&str>;
  fn sort_value(&self, field: Self::SortField) -> SortValue<'_>;
}

macro_rules! sort_fields {
  ($(#[$doc:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
    $(#[$doc])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
    )]
    #[serde(rename_all = "camelCase")]
    #[strum(serialize_all = "camelCase")]
    pub enum $name {
      $($variant),+
    }
  };
}

fn date(d: Option<DateTime<Utc>>) -> SortValue<'static> {
  d.map_or(SortValue::Missing, SortValue::Date)
}

fn push_opt<'a>(fields: &mut Vec<&'a str>, value: &'a Option<String>) {
  if let Some(v) = value {
    fields.push(v);
  }
}

// ─── Blog articles ───────────────────────────────────────────────────────────

sort_fields!(
  /// Default: newest first.
  ArticleSortField { PublishedAt, UpdatedAt, Title, SeriesPart }
);

impl Aggregatable for BlogArticle {
  type SortField = ArticleSortField;

  fn default_sort() -> Sort<ArticleSortField> { Sort::desc(ArticleSortField::PublishedAt) }

  fn id(&self) -> &str { &self.slug }

  fn meta(&self) -> &Meta { &self.meta }

  fn persona(&self) -> &str { &self.persona }

  fn category(&self) -> Option<&str> { self.category.as_deref() }

  fn date(&self) -> Option<DateTime<Utc>> { Some(self.published_at) }

  fn group(&self) -> Option<&str> { self.series.as_ref().map(|s| s.name.as_str()) }

  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.meta.title.as_str(), self.slug.as_str()];
    push_opt(&mut fields, &self.meta.description);
    push_opt(&mut fields, &self.excerpt);
    push_opt(&mut fields, &self.content);
    fields
  }

  fn sort_value(&self, field: ArticleSortField) -> SortValue<'_> {
    match field {
      ArticleSortField::PublishedAt => SortValue::Date(self.published_at),
      ArticleSortField::UpdatedAt => date(self.meta.updated_at),
      ArticleSortField::Title => SortValue::Text(&self.meta.title),
      ArticleSortField::SeriesPart => self
        .series
        .as_ref()
        .map_or(SortValue::Missing, |s| SortValue::Number(f64::from(s.part))),
    }
  }
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

sort_fields!(
  /// Default: explicit `sortOrder`, ascending.
  PortfolioSortField { SortOrder, Title, Date }
);

impl Aggregatable for PortfolioItem {
  type SortField = PortfolioSortField;

  fn default_sort() -> Sort<PortfolioSortField> { Sort::asc(PortfolioSortField::SortOrder) }

  fn id(&self) -> &str { &self.slug }

  fn meta(&self) -> &Meta { &self.meta }

  fn persona(&self) -> &str { &self.persona }

  fn category(&self) -> Option<&str> { self.category.as_deref() }

  fn date(&self) -> Option<DateTime<Utc>> { self.date.or(self.meta.created_at) }

  fn group(&self) -> Option<&str> { Some(&self.collection) }

  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.meta.title.as_str(), self.slug.as_str()];
    push_opt(&mut fields, &self.meta.description);
    fields.extend(self.technologies.iter().map(String::as_str));
    fields
  }

  fn sort_value(&self, field: PortfolioSortField) -> SortValue<'_> {
    match field {
      PortfolioSortField::SortOrder => SortValue::Number(f64::from(self.sort_order)),
      PortfolioSortField::Title => SortValue::Text(&self.meta.title),
      PortfolioSortField::Date => date(Aggregatable::date(self)),
    }
  }
}

sort_fields!(
  /// Default: explicit `sortOrder`, ascending.
  CollectionSortField { SortOrder, Name, ItemCount }
);

impl Aggregatable for PortfolioCollection {
  type SortField = CollectionSortField;

  fn default_sort() -> Sort<CollectionSortField> { Sort::asc(CollectionSortField::SortOrder) }

  fn id(&self) -> &str { &self.key }

  fn meta(&self) -> &Meta { &self.meta }

  fn persona(&self) -> &str { &self.persona }

  fn category(&self) -> Option<&str> { None }

  fn date(&self) -> Option<DateTime<Utc>> { self.meta.created_at }

  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.name.as_str(), self.meta.title.as_str(), self.key.as_str()];
    push_opt(&mut fields, &self.meta.description);
    fields
  }

  fn sort_value(&self, field: CollectionSortField) -> SortValue<'_> {
    match field {
      CollectionSortField::SortOrder => SortValue::Number(f64::from(self.sort_order)),
      CollectionSortField::Name => SortValue::Text(&self.name),
      CollectionSortField::ItemCount => SortValue::Number(f64::from(self.item_count)),
    }
  }
}

// ─── Resume ──────────────────────────────────────────────────────────────────

sort_fields!(
  /// Default: most recent start first.
  ResumeSortField { StartDate, EndDate, Company }
);

fn midnight(d: chrono::NaiveDate) -> DateTime<Utc> { d.and_time(chrono::NaiveTime::MIN).and_utc() }

impl Aggregatable for ResumeEntry {
  type SortField = ResumeSortField;

  fn default_sort() -> Sort<ResumeSortField> { Sort::desc(ResumeSortField::StartDate) }

  fn id(&self) -> &str { &self.slug }

  fn meta(&self) -> &Meta { &self.meta }

  fn persona(&self) -> &str { &self.persona }

  /// The entry type (`employment`, `contract`, …).
  fn category(&self) -> Option<&str> { Some(self.entry_type.as_ref()) }

  fn date(&self) -> Option<DateTime<Utc>> { Some(midnight(self.start_date)) }

  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![
      self.company.as_str(),
      self.position.as_str(),
      self.meta.title.as_str(),
    ];
    push_opt(&mut fields, &self.location);
    push_opt(&mut fields, &self.meta.description);
    fields.extend(self.skill_refs());
    fields
  }

  fn sort_value(&self, field: ResumeSortField) -> SortValue<'_> {
    match field {
      ResumeSortField::StartDate => SortValue::Date(midnight(self.start_date)),
      ResumeSortField::EndDate => date(self.end_date.filter(|_| !self.current).map(midnight)),
      ResumeSortField::Company => SortValue::Text(&self.company),
    }
  }
}

// ─── Skills ──────────────────────────────────────────────────────────────────

sort_fields!(
  /// Default: category, ascending.
  SkillSortField { Category, Name, Proficiency, YearsExperience }
);

impl Aggregatable for Skill {
  type SortField = SkillSortField;

  fn default_sort() -> Sort<SkillSortField> { Sort::asc(SkillSortField::Category) }

  fn id(&self) -> &str { &self.key }

  fn meta(&self) -> &Meta { &self.meta }

  fn persona(&self) -> &str { &self.persona }

  fn category(&self) -> Option<&str> { Some(self.category.as_ref()) }

  fn date(&self) -> Option<DateTime<Utc>> { self.meta.created_at }

  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.name.as_str(), self.key.as_str()];
    push_opt(&mut fields, &self.meta.description);
    fields.extend(self.projects.iter().map(String::as_str));
    fields
  }

  fn sort_value(&self, field: SkillSortField) -> SortValue<'_> {
    match field {
      SkillSortField::Category => SortValue::Text(self.category.as_ref()),
      SkillSortField::Name => SortValue::Text(&self.name),
      SkillSortField::Proficiency => SortValue::Number(f64::from(self.proficiency.rank())),
      SkillSortField::YearsExperience => SortValue::Number(self.years_experience),
    }
  }
}
