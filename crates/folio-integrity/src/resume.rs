use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use folio_core::{
  Report,
  content::{ContentKind, ResumeEntry, ResumeType},
  dates::{GapOptions, detect_gaps, find_overlaps},
  snapshot::ContentSnapshot,
};

use crate::skills::SkillIndex;

/// Skill and technology references resolve (warning otherwise), and the
/// current/endDate and ordering rules hold (error otherwise).
pub fn validate_resume_references(snapshot: &ContentSnapshot) -> Report {
  let mut report = Report::new();
  let index = SkillIndex::new(&snapshot.skills);
  let kind = ContentKind::ResumeEntry;

  for entry in &snapshot.resume {
    for (field, refs) in [("skills", &entry.skills), ("technologies", &entry.technologies)] {
      for reference in refs {
        if index.resolve(reference).is_none() {
          report.warn(format!(
            "{kind} `{}`: {field} references unknown skill `{reference}`",
            entry.slug
          ));
        }
      }
    }

    match entry.end_date {
      None if !entry.current => report.error(format!(
        "{kind} `{}`: endDate is required unless the entry is current",
        entry.slug
      )),
      Some(end) if entry.start_date >= end => report.error(format!(
        "{kind} `{}`: startDate {} must be before endDate {end}",
        entry.slug, entry.start_date
      )),
      Some(_) if entry.current => report.warn(format!(
        "{kind} `{}`: endDate is set on a current entry and will be ignored",
        entry.slug
      )),
      _ => {}
    }
  }
  report
}

pub fn validate_resume_overlaps(snapshot: &ContentSnapshot) -> Report {
  validate_resume_overlaps_at(snapshot, Utc::now().date_naive())
}

/// Employment entries of one persona should not run concurrently. Other
/// entry types may overlap anything.
pub fn validate_resume_overlaps_at(snapshot: &ContentSnapshot, today: NaiveDate) -> Report {
  let mut report = Report::new();
  let by_persona = group_by_persona(&snapshot.resume, |e| e.entry_type.is_employment());

  for (persona, entries) in by_persona {
    for overlap in find_overlaps(&entries, today) {
      report.warn(format!(
        "{} `{}`: employment overlaps `{}` by {} days (persona `{persona}`)",
        ContentKind::ResumeEntry,
        overlap.first,
        overlap.second,
        overlap.days
      ));
    }
  }
  report
}

pub fn validate_resume_gaps(snapshot: &ContentSnapshot, options: &GapOptions) -> Report {
  validate_resume_gaps_at(snapshot, options, Utc::now().date_naive())
}

/// Noteworthy breaks in each persona's work history. Education entries do
/// not close a gap.
pub fn validate_resume_gaps_at(
  snapshot: &ContentSnapshot,
  options: &GapOptions,
  today: NaiveDate,
) -> Report {
  let mut report = Report::new();
  let by_persona = group_by_persona(&snapshot.resume, |e| e.entry_type != ResumeType::Education);

  for (persona, entries) in by_persona {
    for gap in detect_gaps(&entries, today, options) {
      report.warn(format!(
        "{} `{persona}`: {}-day resume gap between `{}` and `{}` ({} to {})",
        ContentKind::Persona,
        gap.days,
        gap.after,
        gap.before,
        gap.from,
        gap.until
      ));
    }
  }
  report
}

fn group_by_persona(
  entries: &[ResumeEntry],
  keep: impl Fn(&ResumeEntry) -> bool,
) -> BTreeMap<&str, Vec<&ResumeEntry>> {
  let mut groups: BTreeMap<&str, Vec<&ResumeEntry>> = BTreeMap::new();
  for entry in entries.iter().filter(|e| !e.meta.draft && keep(e)) {
    groups.entry(entry.persona.as_str()).or_default().push(entry);
  }
  groups
}
