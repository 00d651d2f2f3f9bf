//! Filtering, sorting and pagination over Folio content.
//!
//! Each content type implements [`Aggregatable`], which names a closed set
//! of sort fields and maps each to a typed accessor. An [`Aggregator`] holds
//! one type's published records and answers [`Aggregator::aggregate`],
//! [`Aggregator::related`] and [`Aggregator::facets`].

mod aggregator;
mod kinds;
mod query;
mod sort;

pub use aggregator::{Aggregator, Facets, Related};
use folio_core::content::{
  BlogArticle, PortfolioCollection, PortfolioItem, ResumeEntry, Skill,
};
pub use kinds::{
  Aggregatable, ArticleSortField, CollectionSortField, PortfolioSortField, ResumeSortField,
  SkillSortField,
};
pub use query::{
  Aggregated, DEFAULT_LIMIT, Filters, MAX_LIMIT, Pagination, Sort, SortDirection,
};
pub use sort::{SortValue, compare};

pub type ArticleAggregator = Aggregator<BlogArticle>;
pub type PortfolioAggregator = Aggregator<PortfolioItem>;
pub type CollectionAggregator = Aggregator<PortfolioCollection>;
pub type ResumeAggregator = Aggregator<ResumeEntry>;
pub type SkillAggregator = Aggregator<Skill>;
