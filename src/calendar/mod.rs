//! # Calendar Payload
//!
//! Shapes built events into what a month-grid calendar widget renders: one view per
//! month with its display options, a color legend, and the detail line shown when an
//! event is clicked.

mod click;
mod options;
mod widget;

pub use click::click_detail;
pub use options::CalendarOptions;
pub use options::HeaderToolbar;
pub use widget::ExtendedProps;
pub use widget::WidgetEvent;

use crate::schedule::filter_month;
use crate::schedule::Color;
use crate::schedule::Event;
use serde::Serialize;

/// Page heading
pub const PAGE_TITLE: &str = "수시 지원/발표 일정 캘린더";

/// One month grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthView {
    /// `"{year}년 {month}월"`
    pub heading: String,
    /// Stable widget key, `"cal-{year}-{month}"`
    pub key: String,
    pub year: i32,
    pub month: u32,
    pub options: CalendarOptions,
    pub events: Vec<WidgetEvent>,
}

impl MonthView {
    /// View of the events dated in `year`-`month`; `None` for an invalid month.
    pub fn new(events: &[Event], year: i32, month: u32, locale: &str) -> Option<Self> {
        let options = CalendarOptions::for_month(year, month, locale)?;
        Some(MonthView {
            heading: format!("{year}년 {month}월"),
            key: format!("cal-{year}-{month}"),
            year,
            month,
            options,
            events: filter_month(events, year, month).iter().map(WidgetEvent::from).collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Everything the calendar page shows for one upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarPage {
    pub title: String,
    pub legend: Vec<LegendEntry>,
    pub target_year: i32,
    pub months: Vec<MonthView>,
    /// Data records that could not be read
    pub skipped_rows: usize,
}

/// Color legend, screening keywords first
pub fn legend(interview_keyword: &str, essay_keyword: &str) -> Vec<LegendEntry> {
    [
        (interview_keyword, Color::Blue),
        (essay_keyword, Color::Purple),
        ("1차 발표", Color::Yellow),
        ("2차 발표(최종)", Color::Green),
    ]
    .into_iter()
    .map(|(label, color)| LegendEntry { label: label.to_owned(), color })
    .collect()
}

/// Builds the page: one [`MonthView`] per requested month of the target year, in the
/// order given. Invalid months are left out.
pub fn render_page(events: &[Event], target_year: i32, months: &[u32], locale: &str, legend: Vec<LegendEntry>) -> CalendarPage {
    CalendarPage {
        title: PAGE_TITLE.to_owned(),
        legend,
        target_year,
        months: months
            .iter()
            .filter_map(|month| MonthView::new(events, target_year, *month, locale))
            .collect(),
        skipped_rows: 0,
    }
}
