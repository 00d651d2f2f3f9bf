use std::collections::HashMap;

use folio_core::{
  Report,
  content::{ContentKind, Persona},
  snapshot::ContentSnapshot,
};

/// Exactly one published persona carries `primary`.
pub fn validate_primary_persona(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let primaries: Vec<&str> = snapshot
    .personas
    .iter()
    .filter(|p| p.primary && !p.meta.draft)
    .map(|p| p.key.as_str())
    .collect();

  match primaries.as_slice() {
    [_] => {}
    [] => report.error("persona: no published persona has primary set"),
    many => report.error(format!(
      "persona: {} published personas have primary set ({})",
      many.len(),
      many.join(", ")
    )),
  }

  for p in snapshot.personas.iter().filter(|p| p.primary && p.meta.draft) {
    report.warn(format!("persona `{}`: primary is set on a draft", p.key));
  }
  report
}

/// Every `persona` field in the graph names a persona. Unknown keys are
/// errors; draft personas are warnings.
pub fn validate_persona_references(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let personas: HashMap<&str, &Persona> = snapshot
    .personas
    .iter()
    .map(|p| (p.key.as_str(), p))
    .collect();

  for (kind, id, key) in persona_refs(snapshot) {
    match personas.get(key) {
      None => report.error(format!(
        "{kind} `{id}`: persona references unknown persona `{key}`"
      )),
      Some(p) if p.meta.draft => report.warn(format!(
        "{kind} `{id}`: persona references draft persona `{key}`"
      )),
      Some(_) => {}
    }
  }
  report
}

/// `(kind, id, persona)` for every record that names an owning persona.
fn persona_refs(
  snapshot: &ContentSnapshot,
) -> impl Iterator<Item = (ContentKind, &str, &str)> {
  let skills = snapshot
    .skills
    .iter()
    .map(|s| (ContentKind::Skill, s.key.as_str(), s.persona.as_str()));
  let articles = snapshot
    .articles
    .iter()
    .map(|a| (ContentKind::BlogArticle, a.slug.as_str(), a.persona.as_str()));
  let collections = snapshot.collections.iter().map(|c| {
    (ContentKind::PortfolioCollection, c.key.as_str(), c.persona.as_str())
  });
  let items = snapshot
    .items
    .iter()
    .map(|i| (ContentKind::PortfolioItem, i.slug.as_str(), i.persona.as_str()));
  let resume = snapshot
    .resume
    .iter()
    .map(|r| (ContentKind::ResumeEntry, r.slug.as_str(), r.persona.as_str()));

  skills
    .chain(articles)
    .chain(collections)
    .chain(items)
    .chain(resume)
}
