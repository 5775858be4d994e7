//! Best-effort normalization of free-form date cells.
//!
//! Cells arrive as text: ISO dates rendered from date-formatted numbers, or whatever a
//! person typed (`2025. 11. 3.`, `2025년 11월 3일 (월)`, `Nov 3, 2025`, `11/3`). Anything
//! after the date portion that looks like a time or a weekday is ignored. Bare numbers
//! are never read as serial dates.

use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use regex::Captures;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("Hardcode regex pattern"));

static YEAR_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})\s*(?:[-/.]|년)\s*(?P<month>\d{1,2})\s*(?:[-/.]|월)\s*(?P<day>\d{1,2})(?:\s*(?:일|\.))?(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<first>\d{1,2})\s*[-/.]\s*(?P<second>\d{1,2})\s*[-/.]\s*(?P<year>\d{4})(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

static NAME_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z]{3,9})\.?[\s-]*(?P<day>\d{1,2})(?:st|nd|rd|th)?\s*,?[\s-]*(?P<year>\d{4})(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

static DAY_NAME_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<day>\d{1,2})(?:st|nd|rd|th)?[\s-]*(?P<name>[A-Za-z]{3,9})\.?\s*,?[\s-]*(?P<year>\d{4})(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<first>\d{1,2})\s*(?:[-/.]|월)\s*(?P<second>\d{1,2})(?:\s*(?:일|\.))?(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

static NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z]{3,9})\.?\s*(?P<day>\d{1,2})(?:st|nd|rd|th)?(?P<tail>.*)$")
        .expect("Hardcode regex pattern")
});

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Parses a cell into a calendar date; year-less shapes take the current year.
pub fn parse_date(cell: Option<&str>) -> Option<NaiveDate> {
    parse_date_in(cell, Local::now().year())
}

/// Parses a cell into a calendar date, using `default_year` for shapes without a year.
pub fn parse_date_in(cell: Option<&str>, default_year: i32) -> Option<NaiveDate> {
    let text = cell?.trim();
    if text.is_empty() || NUMERIC.is_match(text) {
        return None;
    }

    if let Some(captures) = accept(&YEAR_MONTH_DAY, text) {
        return NaiveDate::from_ymd_opt(year(&captures)?, number(&captures, "month")?, number(&captures, "day")?);
    }
    if let Some(captures) = accept(&MONTH_DAY_YEAR, text) {
        return month_first(year(&captures)?, number(&captures, "first")?, number(&captures, "second")?);
    }
    if let Some(captures) = accept(&NAME_DAY_YEAR, text).or_else(|| accept(&DAY_NAME_YEAR, text)) {
        return named(year(&captures)?, &captures);
    }
    if let Some(captures) = accept(&MONTH_DAY, text) {
        return month_first(default_year, number(&captures, "first")?, number(&captures, "second")?);
    }
    if let Some(captures) = accept(&NAME_DAY, text) {
        return named(default_year, &captures);
    }
    None
}

/// Matches `pattern` when whatever follows the date is empty, a time, or a weekday note.
fn accept<'t>(pattern: &Regex, text: &'t str) -> Option<Captures<'t>> {
    let captures = pattern.captures(text)?;
    let tail = captures.name("tail").map(|tail| tail.as_str()).unwrap_or_default();
    let is_boundary = tail.is_empty()
        || tail.starts_with(|character: char| character.is_whitespace() || matches!(character, 'T' | '(' | ','));
    is_boundary.then_some(captures)
}

fn number(captures: &Captures, name: &str) -> Option<u32> {
    captures.name(name)?.as_str().parse().ok()
}

fn year(captures: &Captures) -> Option<i32> {
    captures.name("year")?.as_str().parse().ok()
}

/// Month first, unless the first number cannot be a month
fn month_first(year: i32, first: u32, second: u32) -> Option<NaiveDate> {
    if first > 12 {
        NaiveDate::from_ymd_opt(year, second, first)
    } else {
        NaiveDate::from_ymd_opt(year, first, second)
    }
}

fn named(year: i32, captures: &Captures) -> Option<NaiveDate> {
    let month = month_from_name(captures.name("name")?.as_str())?;
    NaiveDate::from_ymd_opt(year, month, number(captures, "day")?)
}

/// `Nov`, `nov.`, `Sept`, `NOVEMBER` → month number
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| month.starts_with(&name))
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn parse(text: &str) -> Option<NaiveDate> {
        parse_date_in(Some(text), 2025)
    }

    #[test]
    fn absent_and_blank_cells() {
        assert_eq!(parse_date_in(None, 2025), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn serial_numbers_are_not_dates() {
        assert_eq!(parse("45964"), None);
        assert_eq!(parse("45964.0"), None);
        assert_eq!(parse("-3"), None);
        assert_eq!(parse("11.3"), None);
    }

    #[test]
    fn year_first_shapes() {
        assert_eq!(parse("2025-11-03"), date(2025, 11, 3));
        assert_eq!(parse("2025/11/3"), date(2025, 11, 3));
        assert_eq!(parse("2025.11.03"), date(2025, 11, 3));
        assert_eq!(parse("2025. 11. 3."), date(2025, 11, 3));
        assert_eq!(parse("2025-11-03 00:00:00"), date(2025, 11, 3));
        assert_eq!(parse("2025-11-03T09:30"), date(2025, 11, 3));
        assert_eq!(parse(" 2025-10-18 "), date(2025, 10, 18));
    }

    #[test]
    fn korean_shapes() {
        assert_eq!(parse("2025년 11월 3일"), date(2025, 11, 3));
        assert_eq!(parse("2025년11월3일(월)"), date(2025, 11, 3));
        assert_eq!(parse("2025년 12월 12일 10:00"), date(2025, 12, 12));
        assert_eq!(parse("11월 3일"), date(2025, 11, 3));
    }

    #[test]
    fn month_first_shapes() {
        assert_eq!(parse("11/3/2025"), date(2025, 11, 3));
        assert_eq!(parse("11-03-2025"), date(2025, 11, 3));
        assert_eq!(parse("25/12/2025"), date(2025, 12, 25));
        assert_eq!(parse("11/3"), date(2025, 11, 3));
        assert_eq!(parse_date_in(Some("11/3"), 2024), date(2024, 11, 3));
    }

    #[test]
    fn month_name_shapes() {
        assert_eq!(parse("Nov 3, 2025"), date(2025, 11, 3));
        assert_eq!(parse("November 3 2025"), date(2025, 11, 3));
        assert_eq!(parse("3 Nov 2025"), date(2025, 11, 3));
        assert_eq!(parse("Sept. 1, 2025"), date(2025, 9, 1));
        assert_eq!(parse("Dec 24"), date(2025, 12, 24));
        assert_eq!(parse("3rd Nov 2025"), date(2025, 11, 3));
        assert_eq!(parse("21st-Oct-2025"), date(2025, 10, 21));
        assert_eq!(parse("Nov. 3rd, 2025"), date(2025, 11, 3));
    }

    #[test]
    fn invalid_dates_and_garbage() {
        assert_eq!(parse("2025-02-30"), None);
        assert_eq!(parse("2025-13-01"), None);
        assert_eq!(parse("미정"), None);
        assert_eq!(parse("추후 공지"), None);
        assert_eq!(parse("Nov 2025"), None);
        assert_eq!(parse("Foo 3"), None);
        assert_eq!(parse("20251103x"), None);
        assert_eq!(parse("25.11.03"), None);
        assert_eq!(parse("11/03/25"), None);
    }

    #[test]
    fn current_year_default() {
        let parsed = parse_date(Some("10/1")).map(|date| date.year());
        assert_eq!(parsed, Some(Local::now().year()));
    }
}
