use chrono::NaiveDate;
use serde::Serialize;

/// Display options for one month grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOptions {
    pub initial_view: String,
    pub locale: String,
    /// First day of the week, 0 = Sunday
    pub first_day: u8,
    pub height: u32,
    pub initial_date: NaiveDate,
    pub header_toolbar: HeaderToolbar,
    pub day_max_event_rows: bool,
    pub fixed_week_count: bool,
    pub event_display: String,
    pub event_order: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeaderToolbar {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl CalendarOptions {
    /// Options for a month grid opened on the first of `month`; `None` for an invalid month.
    pub fn for_month(year: i32, month: u32, locale: &str) -> Option<Self> {
        Some(CalendarOptions {
            initial_view: "dayGridMonth".to_owned(),
            locale: locale.to_owned(),
            first_day: 0,
            height: 720,
            initial_date: NaiveDate::from_ymd_opt(year, month, 1)?,
            header_toolbar: HeaderToolbar {
                center: "title".to_owned(),
                ..HeaderToolbar::default()
            },
            day_max_event_rows: true,
            fixed_week_count: false,
            event_display: "block".to_owned(),
            event_order: "title,start".to_owned(),
        })
    }
}
