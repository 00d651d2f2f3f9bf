use std::collections::{HashMap, HashSet};

use folio_core::{
  Report,
  content::{ContentKind, Skill},
  slug::normalize_slug,
  snapshot::ContentSnapshot,
};

/// Resolves informal skill references to defined skills.
///
/// A reference matches a skill whose key equals it, whose key equals its
/// normalized slug (`"Type Script"` → `type-script`), or whose name equals it
/// ignoring case.
pub struct SkillIndex<'a> {
  by_key:  HashMap<&'a str, &'a Skill>,
  by_name: HashMap<String, &'a Skill>,
}

impl<'a> SkillIndex<'a> {
  pub fn new(skills: &'a [Skill]) -> Self {
    Self {
      by_key:  skills.iter().map(|s| (s.key.as_str(), s)).collect(),
      by_name: skills.iter().map(|s| (s.name.to_lowercase(), s)).collect(),
    }
  }

  pub fn resolve(&self, reference: &str) -> Option<&'a Skill> {
    self
      .by_key
      .get(reference)
      .or_else(|| self.by_key.get(normalize_slug(reference).as_str()))
      .or_else(|| self.by_name.get(&reference.to_lowercase()))
      .copied()
  }
}

/// Persona skill lists should name defined skills.
pub fn validate_persona_skills(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let index = SkillIndex::new(&snapshot.skills);
  for persona in &snapshot.personas {
    for reference in &persona.skills {
      if index.resolve(reference).is_none() {
        report.warn(format!(
          "{} `{}`: skills references unknown skill `{reference}`",
          ContentKind::Persona,
          persona.key
        ));
      }
    }
  }
  report
}

/// Portfolio technologies and tags should name defined skills.
pub fn validate_portfolio_skills(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let index = SkillIndex::new(&snapshot.skills);
  for item in &snapshot.items {
    for (field, refs) in [("technologies", &item.technologies), ("tags", &item.meta.tags)] {
      for reference in refs {
        if index.resolve(reference).is_none() {
          report.warn(format!(
            "{} `{}`: {field} references unknown skill `{reference}`",
            ContentKind::PortfolioItem,
            item.slug
          ));
        }
      }
    }
  }
  report
}

/// Skills nothing points at. Personas, resume entries and portfolio items
/// (technologies and tags) all count as references.
pub fn validate_orphan_skills(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let index = SkillIndex::new(&snapshot.skills);

  let persona_refs = snapshot
    .personas
    .iter()
    .flat_map(|p| p.skills.iter().map(String::as_str));
  let resume_refs = snapshot.resume.iter().flat_map(|r| r.skill_refs());
  let item_refs = snapshot.items.iter().flat_map(|i| {
    i.technologies
      .iter()
      .chain(i.meta.tags.iter())
      .map(String::as_str)
  });

  let used: HashSet<&str> = persona_refs
    .chain(resume_refs)
    .chain(item_refs)
    .filter_map(|r| index.resolve(r))
    .map(|s| s.key.as_str())
    .collect();

  for skill in &snapshot.skills {
    if !used.contains(skill.key.as_str()) {
      report.warn(format!(
        "{} `{}`: not referenced by any persona, resume entry or portfolio item",
        ContentKind::Skill,
        skill.key
      ));
    }
  }
  report
}
