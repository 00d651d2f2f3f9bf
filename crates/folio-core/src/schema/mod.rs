//! Per-record schema validation.
//!
//! Each `validate_*` function takes an untrusted JSON value and returns a
//! [`Validated`] record. Validation never panics and never stops at the first
//! broken rule; every failure is reported with its field path.

mod fields;

use serde_json::Value;

use crate::{
  content::{
    BlogArticle, ContactSubmission, Image, Persona, PortfolioCollection,
    PortfolioItem, Proficiency, ResumeEntry, ResumeType, Series, Skill,
    SkillCategory, SocialLink,
  },
  report::{ErrorCode, Validated},
};
use fields::Fields;

/// Message for the combined `current`/`endDate`/ordering refinement on
/// resume entries.
pub const RESUME_DATES_MESSAGE: &str =
  "End date is required unless the position is current, and the start date must precede it";

macro_rules! open {
  ($value:expr, $kind:literal) => {
    match Fields::of($value, $kind) {
      Ok(f) => f,
      Err(errors) => return Validated::Invalid(errors),
    }
  };
}

// ─── Personas and skills ─────────────────────────────────────────────────────

pub fn validate_persona(value: &Value) -> Validated<Persona> {
  let mut f = open!(value, "Persona");
  let key = f.slug("key", "Key");
  let name = f.required_str("name", "Name", 1, 100);
  let headline = f.optional_str("headline", "Headline", 200);
  let bio = f.optional_str("bio", "Bio", 2000);
  let primary = f.bool_or_false("primary");
  let skills = f.string_list("skills");
  let interests = f.string_list("interests");
  let social_links = social_links(&mut f);
  let meta = f.meta();

  f.finish(move || {
    Some(Persona {
      key: key?,
      name: name?,
      headline,
      bio,
      primary,
      skills,
      interests,
      social_links,
      meta: meta?,
    })
  })
}

fn social_links(f: &mut Fields<'_>) -> Vec<SocialLink> {
  let Some(items) = f.array("socialLinks") else {
    return Vec::new();
  };
  let mut links = Vec::with_capacity(items.len());
  for (i, item) in items.iter().enumerate() {
    let Some(mut link) = f.element("socialLinks", i, item) else {
      continue;
    };
    let platform = link.required_str("platform", "Platform", 1, 50);
    let url = link.required_str("url", "URL", 1, 500);
    let url = url.filter(|u| {
      let ok = u.starts_with("https://") || u.starts_with("http://");
      if !ok {
        link.fail("url", "URL must start with http:// or https://", ErrorCode::InvalidFormat);
      }
      ok
    });
    if let (Some(platform), Some(url)) = (platform, url) {
      links.push(SocialLink { platform, url });
    }
    f.absorb(link);
  }
  links
}

pub fn validate_skill(value: &Value) -> Validated<Skill> {
  let mut f = open!(value, "Skill");
  let key = f.slug("key", "Key");
  let name = f.required_str("name", "Name", 1, 100);
  let category = f.enum_value::<SkillCategory>("category", "Category");
  let proficiency = f.enum_value::<Proficiency>("proficiency", "Proficiency");
  let years_experience = f.non_negative_f64("yearsExperience", "Years of experience");
  let projects = f.string_list("projects");
  let persona = f.slug("persona", "Persona");
  let meta = f.meta();

  f.finish(move || {
    Some(Skill {
      key: key?,
      name: name?,
      category: category?,
      proficiency: proficiency?,
      years_experience: years_experience?,
      projects,
      persona: persona?,
      meta: meta?,
    })
  })
}

// ─── Blog ────────────────────────────────────────────────────────────────────

pub fn validate_blog_article(value: &Value) -> Validated<BlogArticle> {
  let mut f = open!(value, "Blog article");
  let slug = f.slug("slug", "Slug");
  let persona = f.slug("persona", "Persona");
  let category = f.optional_str("category", "Category", 50);
  let series = series(&mut f);
  let related_articles = f.slug_list("relatedArticles");
  let published_at = f.datetime("publishedAt", "Published at", true);
  let excerpt = f.optional_str("excerpt", "Excerpt", 500);
  let content = f.optional_str("content", "Content", usize::MAX);
  let meta = f.meta();

  f.finish(move || {
    Some(BlogArticle {
      slug: slug?,
      persona: persona?,
      category,
      series,
      related_articles,
      published_at: published_at?,
      excerpt,
      content,
      meta: meta?,
    })
  })
}

fn series(f: &mut Fields<'_>) -> Option<Series> {
  let mut s = f.nested("series")?;
  let name = s.required_str("name", "Series name", 1, 100);
  let part = s.count("part", "Series part", 1);
  let total = s.count("total", "Series total", 1);
  if let (Some(part), Some(total)) = (part, total)
    && part > total
  {
    s.fail(
      "part",
      format!("Series part {part} exceeds the declared total of {total}"),
      ErrorCode::OutOfRange,
    );
  }
  let ok = name.is_some() && part.is_some() && total.is_some();
  f.absorb(s);
  if !ok {
    return None;
  }
  Some(Series {
    name:  name?,
    part:  part?,
    total: total?,
  })
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

pub fn validate_portfolio_collection(value: &Value) -> Validated<PortfolioCollection> {
  let mut f = open!(value, "Portfolio collection");
  let key = f.slug("key", "Key");
  let name = f.required_str("name", "Name", 1, 100);
  let item_count = f.count("itemCount", "Item count", 0);
  let sort_order = f.int_or_zero("sortOrder", "Sort order");
  let persona = f.slug("persona", "Persona");
  let meta = f.meta();

  f.finish(move || {
    Some(PortfolioCollection {
      key: key?,
      name: name?,
      item_count: item_count?,
      sort_order,
      persona: persona?,
      meta: meta?,
    })
  })
}

pub fn validate_portfolio_item(value: &Value) -> Validated<PortfolioItem> {
  let mut f = open!(value, "Portfolio item");
  let slug = f.slug("slug", "Slug");
  let collection = f.slug("collection", "Collection");
  let persona = f.slug("persona", "Persona");
  let category = f.optional_str("category", "Category", 50);
  let images = images(&mut f);
  let technologies = f.string_list("technologies");
  let sort_order = f.int_or_zero("sortOrder", "Sort order");
  let date = f.datetime("date", "Date", false);
  let meta = f.meta();

  f.finish(move || {
    Some(PortfolioItem {
      slug: slug?,
      collection: collection?,
      persona: persona?,
      category,
      images,
      technologies,
      sort_order,
      date,
      meta: meta?,
    })
  })
}

fn images(f: &mut Fields<'_>) -> Vec<Image> {
  let items = f.array("images");
  let Some(items) = items.filter(|items| !items.is_empty()) else {
    if !f.has("images") || items.is_some() {
      f.fail("images", "At least one image is required", ErrorCode::Required);
    }
    return Vec::new();
  };
  let mut images = Vec::with_capacity(items.len());
  for (i, item) in items.iter().enumerate() {
    let Some(mut image) = f.element("images", i, item) else {
      continue;
    };
    let src = image.required_str("src", "Image source", 1, 500);
    let alt = image.optional_str("alt", "Alt text", 300);
    if let Some(src) = src {
      images.push(Image { src, alt });
    }
    f.absorb(image);
  }
  images
}

// ─── Resume ──────────────────────────────────────────────────────────────────

pub fn validate_resume_entry(value: &Value) -> Validated<ResumeEntry> {
  let mut f = open!(value, "Resume entry");
  let slug = f.slug("slug", "Slug");
  let company = f.required_str("company", "Company", 1, 100);
  let position = f.required_str("position", "Position", 1, 100);
  let start_date = f.calendar_date("startDate", "Start date", true);
  let end_date = f.calendar_date("endDate", "End date", false);
  let end_given = f.has("endDate");
  let current = f.bool_or_false("current");
  let entry_type = f.enum_value::<ResumeType>("type", "Type");
  let location = f.optional_str("location", "Location", 100);
  let skills = f.string_list("skills");
  let technologies = f.string_list("technologies");
  let persona = f.slug("persona", "Persona");
  let meta = f.meta();

  if let Some(start) = start_date {
    let missing_end = !current && !end_given;
    let misordered = end_date.is_some_and(|end| start >= end);
    if missing_end || misordered {
      f.fail("endDate", RESUME_DATES_MESSAGE, ErrorCode::Refinement);
    }
  }

  f.finish(move || {
    Some(ResumeEntry {
      slug: slug?,
      company: company?,
      position: position?,
      start_date: start_date?,
      end_date,
      current,
      entry_type: entry_type?,
      location,
      skills,
      technologies,
      persona: persona?,
      meta: meta?,
    })
  })
}

// ─── Contact form ────────────────────────────────────────────────────────────

static EMAIL: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
  regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});

pub fn validate_contact_submission(value: &Value) -> Validated<ContactSubmission> {
  let mut f = open!(value, "Contact submission");
  let name = f.required_str("name", "Name", 2, 100);
  let email = f.required_str("email", "Email", 1, 254).filter(|e| {
    let ok = EMAIL.is_match(e);
    if !ok {
      f.fail("email", "Email must be a valid email address", ErrorCode::InvalidFormat);
    }
    ok
  });
  let subject = f.optional_str("subject", "Subject", 200);
  let message = f.required_str("message", "Message", 10, 5000);
  let honeypot = f.optional_str("honeypot", "Honeypot", 1000);
  let timestamp = f.optional_i64("timestamp", "Timestamp");
  let persona = f.optional_slug("persona", "Persona");

  f.finish(move || {
    Some(ContactSubmission {
      name: name?,
      email: email?,
      subject,
      message: message?,
      honeypot,
      timestamp,
      persona,
    })
  })
}
