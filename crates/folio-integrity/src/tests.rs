//! Fixture-graph tests for the integrity checks.

use chrono::{NaiveDate, TimeZone, Utc};
use folio_core::{
  content::{
    BlogArticle, Image, Meta, Persona, PortfolioCollection, PortfolioItem, Proficiency,
    ResumeEntry, ResumeType, Series, Skill, SkillCategory,
  },
  dates::GapOptions,
  snapshot::ContentSnapshot,
};

use crate::*;

// ─── Fixture builders ────────────────────────────────────────────────────────

fn meta(title: &str) -> Meta {
  Meta {
    title: title.to_string(),
    ..Default::default()
  }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn persona(key: &str, primary: bool, skills: &[&str]) -> Persona {
  Persona {
    key:          key.to_string(),
    name:         key.to_uppercase(),
    headline:     None,
    bio:          None,
    primary,
    skills:       skills.iter().map(|s| s.to_string()).collect(),
    interests:    vec![],
    social_links: vec![],
    meta:         meta(key),
  }
}

fn skill(key: &str, name: &str) -> Skill {
  Skill {
    key:              key.to_string(),
    name:             name.to_string(),
    category:         SkillCategory::Language,
    proficiency:      Proficiency::Advanced,
    years_experience: 4.0,
    projects:         vec![],
    persona:          "developer".to_string(),
    meta:             meta(name),
  }
}

fn article(slug: &str, series: Option<(&str, u32, u32)>) -> BlogArticle {
  BlogArticle {
    slug:             slug.to_string(),
    persona:          "developer".to_string(),
    category:         Some("rust".to_string()),
    series:           series.map(|(name, part, total)| Series {
      name: name.to_string(),
      part,
      total,
    }),
    related_articles: vec![],
    published_at:     Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
    excerpt:          None,
    content:          None,
    meta:             meta(slug),
  }
}

fn collection(key: &str, item_count: u32) -> PortfolioCollection {
  PortfolioCollection {
    key: key.to_string(),
    name: key.to_string(),
    item_count,
    sort_order: 0,
    persona: "developer".to_string(),
    meta: meta(key),
  }
}

fn item(slug: &str, collection: &str) -> PortfolioItem {
  PortfolioItem {
    slug:         slug.to_string(),
    collection:   collection.to_string(),
    persona:      "developer".to_string(),
    category:     None,
    images:       vec![Image {
      src: format!("/img/{slug}.png"),
      alt: Some(slug.to_string()),
    }],
    technologies: vec!["rust".to_string()],
    sort_order:   0,
    date:         None,
    meta:         meta(slug),
  }
}

fn job(slug: &str, start: NaiveDate, end: Option<NaiveDate>) -> ResumeEntry {
  ResumeEntry {
    slug:         slug.to_string(),
    company:      "Acme".to_string(),
    position:     "Engineer".to_string(),
    start_date:   start,
    end_date:     end,
    current:      end.is_none(),
    entry_type:   ResumeType::Employment,
    location:     None,
    skills:       vec!["Rust".to_string()],
    technologies: vec!["typescript".to_string()],
    persona:      "developer".to_string(),
    meta:         meta(slug),
  }
}

/// A graph where every reference resolves.
fn consistent() -> ContentSnapshot {
  let mut related = article("ownership", Some(("rust-basics", 1, 2)));
  related.related_articles = vec!["borrowing".to_string()];

  ContentSnapshot {
    personas:    vec![
      persona("developer", true, &["rust"]),
      persona("writer", false, &[]),
    ],
    skills:      vec![skill("rust", "Rust"), skill("typescript", "TypeScript")],
    articles:    vec![related, article("borrowing", Some(("rust-basics", 2, 2)))],
    collections: vec![collection("web", 2)],
    items:       vec![item("site", "web"), item("shop", "web")],
    resume:      vec![
      job("acme", ymd(2018, 1, 1), Some(ymd(2020, 6, 30))),
      job("globex", ymd(2020, 7, 1), None),
    ],
  }
}

fn options() -> IntegrityOptions {
  IntegrityOptions {
    gaps:  GapOptions::default(),
    today: ymd(2024, 6, 1),
  }
}

// ─── Whole graph ─────────────────────────────────────────────────────────────

#[test]
fn consistent_graph_is_valid_and_clean() {
  let report = validate_all_with(&consistent(), &options());
  assert!(report.valid, "{:?}", report.errors);
  assert!(report.errors.is_empty());
  assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn validate_all_is_deterministic() {
  let snapshot = consistent();
  assert_eq!(
    validate_all_with(&snapshot, &options()),
    validate_all_with(&snapshot, &options())
  );
}

#[test]
fn empty_graph_only_lacks_a_primary_persona() {
  let report = validate_all_with(&ContentSnapshot::default(), &options());
  assert!(!report.valid);
  assert_eq!(report.errors.len(), 1);
  assert!(report.errors[0].contains("primary"));
}

// ─── Keys ────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_keys_are_errors() {
  let mut s = consistent();
  s.skills.push(skill("rust", "Rust again"));
  s.items.push(item("site", "web"));
  s.collections.push(collection("print", 0));
  s.items.push({
    let mut other = item("site", "print");
    other.meta.draft = true;
    other
  });

  let report = validate_unique_keys(&s);
  assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
  assert!(report.errors[0].contains("skill `rust`"));
  assert!(report.errors[1].contains("collection `web`"));
}

// ─── Personas ────────────────────────────────────────────────────────────────

#[test]
fn primary_persona_must_be_unique_and_published() {
  let mut s = consistent();
  s.personas[1].primary = true;
  let report = validate_primary_persona(&s);
  assert!(!report.valid);
  assert!(report.errors[0].contains("developer, writer"));

  s.personas[0].primary = false;
  s.personas[1].meta.draft = true;
  let report = validate_primary_persona(&s);
  assert!(report.errors[0].contains("no published persona"));
  assert!(report.warnings[0].contains("persona `writer`"));
}

#[test]
fn unknown_persona_is_error_and_draft_persona_is_warning() {
  let mut s = consistent();
  s.articles[0].persona = "ghost".to_string();
  s.personas[1].meta.draft = true;
  s.resume[0].persona = "writer".to_string();

  let report = validate_persona_references(&s);
  assert_eq!(report.errors, vec![
    "blog_article `ownership`: persona references unknown persona `ghost`"
  ]);
  assert_eq!(report.warnings, vec![
    "resume_entry `acme`: persona references draft persona `writer`"
  ]);
}

#[test]
fn persona_skills_resolve_by_key_slug_or_name() {
  let mut s = consistent();
  s.personas[0].skills = vec![
    "rust".to_string(),
    "Type Script".to_string(),
    "TYPESCRIPT".to_string(),
    "cobol".to_string(),
  ];
  s.skills[1].key = "type-script".to_string();
  let report = validate_persona_skills(&s);
  assert_eq!(report.warnings.len(), 1);
  assert!(report.warnings[0].ends_with("unknown skill `cobol`"));
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

#[test]
fn item_in_unknown_collection_is_error() {
  let mut s = consistent();
  s.items[0].collection = "nowhere".to_string();
  s.items[1].persona = "writer".to_string();

  let report = validate_portfolio_references(&s);
  assert!(!report.valid);
  assert!(report.errors[0].contains("unknown collection `nowhere`"));
  assert_eq!(report.warnings.len(), 1);
  assert!(report.warnings[0].contains("persona `writer` differs"));
}

#[test]
fn item_count_mismatch_is_only_a_warning() {
  let mut s = consistent();
  s.collections[0].item_count = 5;
  s.items.push(item("blog", "web"));
  s.items.push({
    let mut draft = item("wip", "web");
    draft.meta.draft = true;
    draft
  });

  let counts = validate_collection_item_counts(&s);
  assert!(counts.valid);
  assert!(counts.errors.is_empty());
  assert_eq!(counts.warnings, vec![
    "portfolio_collection `web`: itemCount declares 5 but 3 published items reference it"
  ]);

  let all = validate_all_with(&s, &options());
  assert!(all.valid, "{:?}", all.errors);
}

#[test]
fn unknown_portfolio_skills_are_warnings() {
  let mut s = consistent();
  s.items[0].technologies.push("Type Script".to_string());
  s.items[0].technologies.push("elm".to_string());
  s.items[1].meta.tags = vec!["TypeScript".to_string(), "branding".to_string()];
  s.skills[1].key = "type-script".to_string();

  let report = validate_portfolio_skills(&s);
  assert!(report.valid);
  assert_eq!(report.warnings, vec![
    "portfolio_item `site`: technologies references unknown skill `elm`",
    "portfolio_item `shop`: tags references unknown skill `branding`",
  ]);

  let all = validate_all_with(&s, &options());
  assert!(all.valid, "{:?}", all.errors);
  assert!(all.warnings.iter().any(|w| w.ends_with("unknown skill `branding`")));
}

// ─── Articles ────────────────────────────────────────────────────────────────

#[test]
fn duplicate_series_part_is_error() {
  let mut s = consistent();
  s.articles.push(article("ownership-again", Some(("rust-basics", 1, 2))));

  let report = validate_series_references(&s);
  assert!(!report.valid);
  assert_eq!(report.errors.len(), 1);
  assert!(report.errors[0].contains("duplicate part 1"));
  assert!(report.errors[0].contains("`ownership`, `ownership-again`"));
}

#[test]
fn series_gaps_and_total_mismatch_are_warnings() {
  let mut s = consistent();
  s.articles = vec![
    article("one", Some(("deep-dive", 1, 4))),
    article("three", Some(("deep-dive", 3, 4))),
  ];

  let report = validate_series_references(&s);
  assert!(report.valid);
  assert_eq!(report.warnings, vec![
    "series `deep-dive`: total declares 4 but the highest part is 3",
    "series `deep-dive`: part 2 of 4 is missing",
    "series `deep-dive`: part 4 of 4 is missing",
  ]);
}

#[test]
fn related_articles_warn_when_missing_or_draft() {
  let mut s = consistent();
  s.articles[0].related_articles = vec![
    "borrowing".to_string(),
    "lifetimes".to_string(),
    "ownership".to_string(),
  ];
  s.articles[1].meta.draft = true;

  let report = validate_related_articles(&s);
  assert!(report.valid);
  assert_eq!(report.warnings.len(), 3);
  assert!(report.warnings[0].contains("draft article `borrowing`"));
  assert!(report.warnings[1].contains("unknown article `lifetimes`"));
  assert!(report.warnings[2].contains("the article itself"));
}

// ─── Resume ──────────────────────────────────────────────────────────────────

#[test]
fn resume_chronology_violations_are_errors() {
  let mut s = consistent();
  s.resume[0].end_date = Some(ymd(2017, 1, 1));
  s.resume.push({
    let mut open = job("initech", ymd(2016, 1, 1), None);
    open.current = false;
    open
  });

  let report = validate_resume_references(&s);
  assert_eq!(report.errors.len(), 2);
  assert!(report.errors[0].contains("must be before endDate"));
  assert!(report.errors[1].contains("endDate is required"));
}

#[test]
fn unknown_resume_skills_are_warnings() {
  let mut s = consistent();
  s.resume[1].technologies.push("fortran".to_string());
  let report = validate_resume_references(&s);
  assert!(report.valid);
  assert_eq!(report.warnings, vec![
    "resume_entry `globex`: technologies references unknown skill `fortran`"
  ]);
}

#[test]
fn overlapping_employment_warns_but_education_does_not() {
  let mut s = consistent();
  s.resume.push(job("moonlight", ymd(2019, 1, 1), Some(ymd(2019, 12, 31))));
  s.resume.push({
    let mut degree = job("masters", ymd(2019, 1, 1), Some(ymd(2021, 1, 1)));
    degree.entry_type = ResumeType::Education;
    degree
  });

  let report = validate_resume_overlaps_at(&s, ymd(2024, 6, 1));
  assert!(report.valid);
  assert_eq!(report.warnings.len(), 1);
  assert!(report.warnings[0].contains("`acme`: employment overlaps `moonlight`"));
}

#[test]
fn long_resume_gaps_are_reported_per_persona() {
  let mut s = consistent();
  s.resume[1].start_date = ymd(2021, 1, 1);

  let report = validate_resume_gaps_at(&s, &GapOptions::default(), ymd(2024, 6, 1));
  assert_eq!(report.warnings.len(), 1);
  assert!(report.warnings[0].contains("between `acme` and `globex`"));

  let lenient = GapOptions { min_gap_days: 365 };
  assert!(validate_resume_gaps_at(&s, &lenient, ymd(2024, 6, 1)).is_clean());
}

// ─── Skills ──────────────────────────────────────────────────────────────────

#[test]
fn unreferenced_skills_are_orphans() {
  let mut s = consistent();
  s.skills.push(skill("haskell", "Haskell"));
  s.skills.push(skill("figma", "Figma"));
  s.items[0].meta.tags = vec!["Figma".to_string()];

  let report = validate_orphan_skills(&s);
  assert_eq!(report.warnings, vec![
    "skill `haskell`: not referenced by any persona, resume entry or portfolio item"
  ]);
}
