//! Date parsing, range checks and calendar-aware duration arithmetic.
//!
//! Nothing here panics or returns `Err` on bad input: unparsable strings
//! become `None`, failed range checks become messages in a
//! [`DateRangeCheck`]. Functions that depend on "now" have an `_at` variant
//! taking the reference instant explicitly.

use chrono::{
  DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::content::ResumeEntry;

/// Longest accepted span for a date range, in years.
pub const MAX_RANGE_YEARS: u32 = 50;
/// How far in the future a range may start, in years.
pub const MAX_FUTURE_START_YEARS: u32 = 5;

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an RFC 3339 date-time (`2024-03-01T09:30:00Z`,
/// `2024-03-01T09:30:00.250+02:00`). Bare dates are rejected.
pub fn parse_datetime_strict(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s.trim())
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

/// Parse any supported date form: an RFC 3339 date-time, a zone-less
/// date-time (taken as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
  let s = s.trim();
  if let Some(dt) = parse_datetime_strict(s) {
    return Some(dt);
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

/// Parse a calendar date from either `YYYY-MM-DD` or a date-time; the time
/// part, if any, is discarded.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .or_else(|| parse_date(s).map(|dt| dt.date_naive()))
}

pub fn is_valid_date(s: &str) -> bool { parse_date(s).is_some() }

// ─── Range validation ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeCheck {
  pub valid:  bool,
  pub errors: Vec<String>,
}

/// Check a start/optional-end pair against the current time.
pub fn validate_date_range(start: &str, end: Option<&str>) -> DateRangeCheck {
  validate_date_range_at(start, end, Utc::now())
}

/// Rules: both ends must parse; `start < end` when an end is given; the range
/// may not exceed [`MAX_RANGE_YEARS`]; `start` may not lie more than
/// [`MAX_FUTURE_START_YEARS`] after `now`.
pub fn validate_date_range_at(
  start: &str,
  end: Option<&str>,
  now: DateTime<Utc>,
) -> DateRangeCheck {
  let mut errors = Vec::new();

  let Some(start_at) = parse_date(start) else {
    errors.push(format!("Invalid start date: {start:?}"));
    return DateRangeCheck {
      valid: false,
      errors,
    };
  };

  let end_at = match end {
    Some(raw) => match parse_date(raw) {
      Some(dt) => Some(dt),
      None => {
        errors.push(format!("Invalid end date: {raw:?}"));
        None
      }
    },
    None => None,
  };

  if let Some(end_at) = end_at {
    if start_at >= end_at {
      errors.push("Start date must be before end date".to_string());
    } else if start_at
      .checked_add_months(Months::new(MAX_RANGE_YEARS * 12))
      .is_some_and(|limit| end_at > limit)
    {
      errors.push(format!(
        "Date range cannot exceed {MAX_RANGE_YEARS} years"
      ));
    }
  }

  if now
    .checked_add_months(Months::new(MAX_FUTURE_START_YEARS * 12))
    .is_some_and(|limit| start_at > limit)
  {
    errors.push(format!(
      "Start date cannot be more than {MAX_FUTURE_START_YEARS} years in the future"
    ));
  }

  DateRangeCheck {
    valid: errors.is_empty(),
    errors,
  }
}

// ─── Durations ───────────────────────────────────────────────────────────────

/// Whole years and months between two dates, plus the raw day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDuration {
  pub years:      u32,
  pub months:     u32,
  pub total_days: i64,
}

impl CalendarDuration {
  pub fn total_months(&self) -> u32 { self.years * 12 + self.months }
}

/// Duration from `start` to `end`, or through today when `end` is `None`.
pub fn calculate_duration(
  start: NaiveDate,
  end: Option<NaiveDate>,
) -> CalendarDuration {
  calculate_duration_at(start, end, Utc::now().date_naive())
}

/// Calendar-aware differencing: years and months are subtracted
/// component-wise and the month count drops by one when the end
/// day-of-month falls before the start day-of-month. A partial final month
/// never rounds up. An end before the start yields a zero duration.
pub fn calculate_duration_at(
  start: NaiveDate,
  end: Option<NaiveDate>,
  today: NaiveDate,
) -> CalendarDuration {
  let end = end.unwrap_or(today);
  if end <= start {
    return CalendarDuration::default();
  }

  let mut years = end.year() - start.year();
  let mut months = end.month() as i32 - start.month() as i32;
  if end.day() < start.day() {
    months -= 1;
  }
  if months < 0 {
    years -= 1;
    months += 12;
  }

  CalendarDuration {
    years:      years.max(0) as u32,
    months:     months.max(0) as u32,
    total_days: (end - start).num_days(),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationStyle {
  /// `2 years, 3 months`
  #[default]
  Long,
  /// `2y3m`
  Short,
}

/// Render a duration, omitting zero components.
pub fn format_duration(d: &CalendarDuration, style: DurationStyle) -> String {
  match style {
    DurationStyle::Short => {
      let mut out = String::new();
      if d.years > 0 {
        out.push_str(&format!("{}y", d.years));
      }
      if d.months > 0 || d.years == 0 {
        out.push_str(&format!("{}m", d.months));
      }
      out
    }
    DurationStyle::Long => {
      let mut parts = Vec::new();
      if d.years > 0 {
        parts.push(plural(d.years, "year"));
      }
      if d.months > 0 {
        parts.push(plural(d.months, "month"));
      }
      if parts.is_empty() {
        "Less than a month".to_string()
      } else {
        parts.join(", ")
      }
    }
  }
}

fn plural(n: u32, unit: &str) -> String {
  if n == 1 {
    format!("1 {unit}")
  } else {
    format!("{n} {unit}s")
  }
}

/// Monday-to-Friday days between `start` and `end`, both inclusive.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> u32 {
  start
    .iter_days()
    .take_while(|d| *d <= end)
    .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    .count() as u32
}

// ─── Gaps and overlaps ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapOptions {
  /// Gaps of this many days or fewer are treated as month-boundary noise.
  pub min_gap_days: i64,
}

impl Default for GapOptions {
  fn default() -> Self { Self { min_gap_days: 31 } }
}

/// A noteworthy stretch with no active entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentGap {
  /// Slug of the entry whose end opens the gap.
  pub after:  String,
  /// Slug of the entry whose start closes the gap.
  pub before: String,
  pub from:   NaiveDate,
  pub until:  NaiveDate,
  pub days:   i64,
}

/// Report gaps longer than `options.min_gap_days` between consecutive entries
/// in start-date order. Overlapping or contiguous entries never open a gap.
pub fn detect_gaps(
  entries: &[&ResumeEntry],
  today: NaiveDate,
  options: &GapOptions,
) -> Vec<EmploymentGap> {
  let mut sorted: Vec<&ResumeEntry> = entries.to_vec();
  sorted.sort_by(|a, b| {
    a.start_date
      .cmp(&b.start_date)
      .then_with(|| a.slug.cmp(&b.slug))
  });

  let mut gaps = Vec::new();
  let mut iter = sorted.into_iter();
  let Some(first) = iter.next() else {
    return gaps;
  };
  let mut latest_end = first.effective_end(today);
  let mut latest_slug = first.slug.as_str();

  for entry in iter {
    if entry.start_date > latest_end {
      let days = (entry.start_date - latest_end).num_days();
      if days > options.min_gap_days {
        gaps.push(EmploymentGap {
          after: latest_slug.to_string(),
          before: entry.slug.clone(),
          from: latest_end,
          until: entry.start_date,
          days,
        });
      }
    }
    let end = entry.effective_end(today);
    if end > latest_end {
      latest_end = end;
      latest_slug = entry.slug.as_str();
    }
  }
  gaps
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
  pub first:  String,
  pub second: String,
  pub days:   i64,
}

/// Every pair of entries whose active ranges intersect. Ranges that merely
/// touch (one ends the day the other starts) do not overlap.
pub fn find_overlaps(entries: &[&ResumeEntry], today: NaiveDate) -> Vec<Overlap> {
  let mut overlaps = Vec::new();
  for (i, a) in entries.iter().enumerate() {
    for b in &entries[i + 1..] {
      let a_end = a.effective_end(today);
      let b_end = b.effective_end(today);
      if a.start_date < b_end && b.start_date < a_end {
        let from = a.start_date.max(b.start_date);
        let until = a_end.min(b_end);
        overlaps.push(Overlap {
          first:  a.slug.clone(),
          second: b.slug.clone(),
          days:   (until - from).num_days(),
        });
      }
    }
  }
  overlaps
}

#[cfg(test)]
mod tests {
  use chrono::{SecondsFormat, TimeZone};
  use proptest::prelude::*;

  use super::*;
  use crate::content::{Meta, ResumeType};

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn entry(slug: &str, start: NaiveDate, end: Option<NaiveDate>) -> ResumeEntry {
    ResumeEntry {
      slug:         slug.into(),
      company:      "Acme".into(),
      position:     "Engineer".into(),
      start_date:   start,
      end_date:     end,
      current:      end.is_none(),
      entry_type:   ResumeType::Employment,
      location:     None,
      skills:       vec![],
      technologies: vec![],
      persona:      "dev".into(),
      meta:         Meta::default(),
    }
  }

  #[test]
  fn parse_date_accepts_both_forms() {
    assert!(parse_date("2024-03-01T09:30:00Z").is_some());
    assert!(parse_date("2024-03-01T09:30:00.123+02:00").is_some());
    assert_eq!(
      parse_date("2024-03-01"),
      Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
    );
    assert!(parse_date("March 1st").is_none());
    assert!(parse_date("2024-13-01").is_none());
    assert!(parse_date("").is_none());
  }

  #[test]
  fn strict_parse_rejects_bare_dates() {
    assert!(parse_datetime_strict("2024-03-01").is_none());
    assert!(parse_datetime_strict("2024-03-01T00:00:00Z").is_some());
  }

  #[test]
  fn range_must_be_ordered() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let r = validate_date_range_at("2023-05-01", Some("2023-05-01"), now);
    assert!(!r.valid);
    assert!(r.errors[0].contains("before end date"));
    assert!(validate_date_range_at("2023-05-01", Some("2023-06-01"), now).valid);
    assert!(validate_date_range_at("2023-05-01", None, now).valid);
  }

  #[test]
  fn range_limits() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let long = validate_date_range_at("1960-01-01", Some("2020-01-01"), now);
    assert!(!long.valid);
    assert!(long.errors[0].contains("50 years"));

    let future = validate_date_range_at("2031-01-01", None, now);
    assert!(!future.valid);
    assert!(future.errors[0].contains("future"));

    let bad = validate_date_range_at("soon", None, now);
    assert!(!bad.valid);
  }

  #[test]
  fn partial_final_month_does_not_round_up() {
    let d = calculate_duration_at(ymd(2023, 1, 1), Some(ymd(2023, 12, 31)), ymd(2024, 1, 1));
    assert_eq!(d.years, 0);
    assert_eq!(d.months, 11);
    assert_eq!(d.total_days, 364);
  }

  #[test]
  fn duration_borrows_across_year_boundary() {
    let d = calculate_duration_at(ymd(2020, 11, 15), Some(ymd(2022, 2, 14)), ymd(2024, 1, 1));
    assert_eq!((d.years, d.months), (1, 2));
  }

  #[test]
  fn open_ended_duration_runs_through_today() {
    let d = calculate_duration_at(ymd(2022, 1, 10), None, ymd(2024, 4, 10));
    assert_eq!((d.years, d.months), (2, 3));
  }

  #[test]
  fn formats_durations() {
    let d = |years, months| CalendarDuration { years, months, total_days: 0 };
    assert_eq!(format_duration(&d(2, 3), DurationStyle::Long), "2 years, 3 months");
    assert_eq!(format_duration(&d(1, 0), DurationStyle::Long), "1 year");
    assert_eq!(format_duration(&d(0, 1), DurationStyle::Long), "1 month");
    assert_eq!(format_duration(&d(0, 0), DurationStyle::Long), "Less than a month");
    assert_eq!(format_duration(&d(2, 3), DurationStyle::Short), "2y3m");
    assert_eq!(format_duration(&d(2, 0), DurationStyle::Short), "2y");
    assert_eq!(format_duration(&d(0, 0), DurationStyle::Short), "0m");
  }

  #[test]
  fn working_days_skip_weekends() {
    // Mon 2024-01-01 through Sun 2024-01-14.
    assert_eq!(working_days(ymd(2024, 1, 1), ymd(2024, 1, 14)), 10);
    assert_eq!(working_days(ymd(2024, 1, 6), ymd(2024, 1, 7)), 0);
    assert_eq!(working_days(ymd(2024, 1, 7), ymd(2024, 1, 1)), 0);
  }

  #[test]
  fn gaps_ignore_month_boundary_noise() {
    let a = entry("a", ymd(2018, 1, 1), Some(ymd(2019, 12, 31)));
    let b = entry("b", ymd(2020, 1, 15), Some(ymd(2021, 6, 30)));
    let c = entry("c", ymd(2022, 3, 1), Some(ymd(2023, 1, 1)));
    let gaps = detect_gaps(&[&c, &a, &b], ymd(2024, 1, 1), &GapOptions::default());
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].after, "b");
    assert_eq!(gaps[0].before, "c");
    assert_eq!(gaps[0].days, 244);
  }

  #[test]
  fn overlapping_entries_do_not_open_gaps() {
    let long = entry("long", ymd(2015, 1, 1), Some(ymd(2022, 1, 1)));
    let short = entry("short", ymd(2016, 1, 1), Some(ymd(2017, 1, 1)));
    let next = entry("next", ymd(2022, 1, 10), None);
    let gaps = detect_gaps(&[&long, &short, &next], ymd(2024, 1, 1), &GapOptions::default());
    assert!(gaps.is_empty());
  }

  #[test]
  fn touching_ranges_do_not_overlap() {
    let a = entry("a", ymd(2020, 1, 1), Some(ymd(2021, 1, 1)));
    let b = entry("b", ymd(2021, 1, 1), Some(ymd(2022, 1, 1)));
    let c = entry("c", ymd(2020, 6, 1), Some(ymd(2020, 7, 1)));
    let overlaps = find_overlaps(&[&a, &b, &c], ymd(2024, 1, 1));
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].first, "a");
    assert_eq!(overlaps[0].second, "c");
    assert_eq!(overlaps[0].days, 30);
  }

  proptest! {
    #[test]
    fn parse_round_trips_epoch_millis(millis in 0i64..4_102_444_800_000) {
      let dt = Utc.timestamp_millis_opt(millis).unwrap();
      let text = dt.to_rfc3339_opts(SecondsFormat::Millis, true);
      let parsed = parse_date(&text).unwrap();
      prop_assert_eq!(parsed.timestamp_millis(), millis);
    }

    #[test]
    fn unordered_ranges_are_invalid(a in 0i64..2_000_000_000, b in 0i64..2_000_000_000) {
      let (start, end) = if a >= b { (a, b) } else { (b, a) };
      let start = Utc.timestamp_opt(start, 0).unwrap().to_rfc3339();
      let end = Utc.timestamp_opt(end, 0).unwrap().to_rfc3339();
      let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
      prop_assert!(!validate_date_range_at(&start, Some(&end), now).valid);
    }
  }
}
