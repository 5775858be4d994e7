use crate::schedule::date::parse_date;
use crate::schedule::fields::class_code;
use crate::schedule::fields::text;
use crate::schedule::fields::truncate_text;
use crate::schedule::schema::ColumnSchema;
use crate::schedule::schema::SkipReason;
use crate::schedule::schema::SourceRow;
use crate::schedule::year::infer_year;
use crate::spreadsheet::Table;
use chrono::Datelike;
use chrono::NaiveDate;
use log::debug;
use log::info;
use serde::Serialize;

/// Default category keyword that marks an interview screening
pub const INTERVIEW_KEYWORD: &str = "면접";
/// Default category keyword that marks an essay screening
pub const ESSAY_KEYWORD: &str = "논술";

/// Which date column an event came from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Interview or essay exam day
    Screening,
    /// First-round result announcement
    StageOneResult,
    /// Final result announcement
    FinalResult,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Screening, Category::StageOneResult, Category::FinalResult];

    /// Display label shown with a clicked event
    pub fn label(self) -> &'static str {
        match self {
            Category::Screening => "전형일",
            Category::StageOneResult => "1단계 발표",
            Category::FinalResult => "최종 발표",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Purple,
    Yellow,
    Green,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }
}

/// One all-day calendar entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub title: String,
    pub date: NaiveDate,
    pub category: Category,
    pub color: Option<Color>,
    pub detail: String,
}

/// A data record that produced no events because it could not be read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based index among the table's data records
    pub record: usize,
    pub reason: SkipReason,
}

/// Events of one build with everything observed along the way
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub events: Vec<Event>,
    pub target_year: i32,
    /// Number of data records examined
    pub rows: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Outcome of turning one record into events
pub type RowOutcome = Result<Vec<Event>, SkipReason>;

/// Turns table rows into calendar events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBuilder {
    pub schema: ColumnSchema,
    pub interview_keyword: String,
    pub essay_keyword: String,
}

impl Default for EventBuilder {
    fn default() -> Self {
        EventBuilder {
            schema: ColumnSchema::default(),
            interview_keyword: INTERVIEW_KEYWORD.to_owned(),
            essay_keyword: ESSAY_KEYWORD.to_owned(),
        }
    }
}

impl EventBuilder {
    /// Builds every event of the table that falls in the target year.
    ///
    /// # Arguments
    /// * `table` - Decoded worksheet, header already split off
    /// * `target_year` - Year of retained events, or `None` to use the most recent year
    ///   among the date columns
    ///
    /// # Returns
    /// Events in row order (screening, stage one, final within a row) together with the
    /// year used. Rows that cannot be read are recorded in [`BuildReport::skipped`] and the
    /// build continues.
    pub fn build(&self, table: &Table, target_year: Option<i32>) -> BuildReport {
        let target_year = target_year.unwrap_or_else(|| infer_year(table, &self.schema.date_columns()));
        let mut report = BuildReport {
            target_year,
            rows: table.len(),
            ..BuildReport::default()
        };
        for (record, cells) in table.records().iter().enumerate() {
            match self.outcome(table, cells, target_year) {
                Ok(events) => report.events.extend(events),
                Err(reason) => {
                    debug!("skipped record {record}: {reason}");
                    report.skipped.push(SkippedRow { record, reason });
                }
            }
        }
        info!(
            "built {} events for {} from {} records ({} skipped)",
            report.events.len(),
            target_year,
            report.rows,
            report.skipped.len(),
        );
        report
    }

    /// Zero to three events for one row: screening, stage-one result, final result.
    pub fn build_row(&self, row: &SourceRow, target_year: i32) -> Vec<Event> {
        let class = class_code(row.class);
        let name = text(row.name);
        let category = text(row.category);
        let detail = format!("{class} / {name} / {}", text(row.auxiliary));
        let title = |width: usize| format!("{class}/{name}/{}/{category}", truncate_text(row.institution, width));

        let mut events = Vec::new();
        for kind in Category::ALL {
            let cell = match kind {
                Category::Screening => row.screening,
                Category::StageOneResult => row.stage_one,
                Category::FinalResult => row.final_result,
            };
            let Some(date) = parse_date(cell).filter(|date| date.year() == target_year) else {
                continue;
            };
            let (title, color) = match kind {
                Category::Screening => (title(2), self.screening_color(&category)),
                Category::StageOneResult => (title(3), Some(Color::Yellow)),
                Category::FinalResult => (title(3), Some(Color::Green)),
            };
            events.push(Event {
                title,
                date,
                category: kind,
                color,
                detail: detail.clone(),
            });
        }
        events
    }

    /// Outcome for a single record of `table`
    pub fn outcome(&self, table: &Table, record: &[Option<String>], target_year: i32) -> RowOutcome {
        let row = self.schema.resolve(record, table.width())?;
        Ok(self.build_row(&row, target_year))
    }

    fn screening_color(&self, category: &str) -> Option<Color> {
        if !self.interview_keyword.is_empty() && category.contains(&self.interview_keyword) {
            Some(Color::Blue)
        } else if !self.essay_keyword.is_empty() && category.contains(&self.essay_keyword) {
            Some(Color::Purple)
        } else {
            None
        }
    }
}

/// Events of the target year (inferred when absent) with the year that was used.
pub fn build_events(table: &Table, target_year: Option<i32>) -> (Vec<Event>, i32) {
    let report = build_report(table, target_year);
    (report.events, report.target_year)
}

/// Like [`build_events`], keeping the per-row skip records.
pub fn build_report(table: &Table, target_year: Option<i32>) -> BuildReport {
    EventBuilder::default().build(table, target_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row<'a>(category: &'a str, screening: &'a str, stage_one: &'a str, final_result: &'a str) -> SourceRow<'a> {
        let cell = |value: &'a str| Some(value).filter(|value| !value.is_empty());
        SourceRow {
            class: Some("31201"),
            name: Some("김하늘"),
            institution: Some("서울대학교"),
            category: cell(category),
            screening: cell(screening),
            stage_one: cell(stage_one),
            final_result: cell(final_result),
            auxiliary: Some("수시 1차"),
        }
    }

    #[test]
    fn interview_row_yields_three_events() {
        let builder = EventBuilder::default();
        let events = builder.build_row(&row("학생부종합(면접)", "2025-11-15", "2025-11-01", "2025-12-12"), 2025);
        assert_eq!(
            events,
            vec![
                Event {
                    title: "12/김하늘/서울/학생부종합(면접)".to_owned(),
                    date: NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
                    category: Category::Screening,
                    color: Some(Color::Blue),
                    detail: "12 / 김하늘 / 수시 1차".to_owned(),
                },
                Event {
                    title: "12/김하늘/서울대/학생부종합(면접)".to_owned(),
                    date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                    category: Category::StageOneResult,
                    color: Some(Color::Yellow),
                    detail: "12 / 김하늘 / 수시 1차".to_owned(),
                },
                Event {
                    title: "12/김하늘/서울대/학생부종합(면접)".to_owned(),
                    date: NaiveDate::from_ymd_opt(2025, 12, 12).unwrap(),
                    category: Category::FinalResult,
                    color: Some(Color::Green),
                    detail: "12 / 김하늘 / 수시 1차".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn screening_color_follows_category() {
        let builder = EventBuilder::default();
        let color = |category: &str| builder.build_row(&row(category, "2025-10-04", "", ""), 2025)[0].color;
        assert_eq!(color("논술전형"), Some(Color::Purple));
        assert_eq!(color("교과"), None);
        assert_eq!(color("면접 및 논술"), Some(Color::Blue));
    }

    #[test]
    fn other_years_are_dropped() {
        let builder = EventBuilder::default();
        let events = builder.build_row(&row("면접", "2024-11-15", "미정", "2025-12-12"), 2025);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, Category::FinalResult);
    }

    #[test]
    fn custom_keywords() {
        let builder = EventBuilder {
            interview_keyword: "interview".to_owned(),
            essay_keyword: "essay".to_owned(),
            ..EventBuilder::default()
        };
        let events = builder.build_row(&row("essay track", "2025-10-04", "", ""), 2025);
        assert_eq!(events[0].color, Some(Color::Purple));
        let events = builder.build_row(&row("면접", "2025-10-04", "", ""), 2025);
        assert_eq!(events[0].color, None);
    }

    #[test]
    fn absent_fields_degrade_to_empty_text() {
        let builder = EventBuilder::default();
        let row = SourceRow {
            stage_one: Some("2025-10-20"),
            ..SourceRow::default()
        };
        let events = builder.build_row(&row, 2025);
        assert_eq!(events[0].title, "///");
        assert_eq!(events[0].detail, " /  / ");
    }

    #[test]
    fn missing_institution_keeps_screening_event() {
        let builder = EventBuilder::default();
        let row = SourceRow {
            institution: None,
            ..row("면접", "2025-11-03", "", "")
        };
        let events = builder.build_row(&row, 2025);
        assert_eq!(
            events,
            vec![Event {
                title: "12/김하늘//면접".to_owned(),
                date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                category: Category::Screening,
                color: Some(Color::Blue),
                detail: "12 / 김하늘 / 수시 1차".to_owned(),
            }]
        );
    }

    #[test]
    fn labels_and_colors() {
        assert_eq!(Category::Screening.label(), "전형일");
        assert_eq!(Category::StageOneResult.label(), "1단계 발표");
        assert_eq!(Category::FinalResult.label(), "최종 발표");
        assert_eq!(Color::Purple.as_str(), "purple");
    }
}
