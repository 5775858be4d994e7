//! # Admission Schedule
//!
//! Turns the rows of an admission results table into dated calendar events. Each row
//! names a student, an institution and an admission track, and may carry up to three
//! dates: the screening day, the stage-one result and the final result.

mod date;
mod event;
mod fields;
mod month;
mod schema;
mod year;

pub use date::parse_date;
pub use date::parse_date_in;
pub use event::build_events;
pub use event::build_report;
pub use event::BuildReport;
pub use event::Category;
pub use event::Color;
pub use event::Event;
pub use event::EventBuilder;
pub use event::RowOutcome;
pub use event::SkippedRow;
pub use event::ESSAY_KEYWORD;
pub use event::INTERVIEW_KEYWORD;
pub use fields::class_code;
pub use fields::text;
pub use fields::truncate_text;
pub use month::filter_month;
pub use schema::ColumnSchema;
pub use schema::SkipReason;
pub use schema::SourceRow;
pub use year::infer_year;
pub use year::infer_year_or;
