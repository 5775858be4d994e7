//! # Admission Calendar
//!
//! Turns an admission results spreadsheet into month calendars of screening days and
//! result announcements. Each data row describes one application (student, institution,
//! admission track) with up to three dates; every date in the target year becomes a
//! color-coded, all-day event.
//!
//! ## Features
//!
//! - **Excel input**: Excel 2007+ workbooks (`.xlsx`, `.xlsm`) and, with the default `xls`
//!   feature, Excel 97-2003 workbooks (`.xls`), decoded in pure Rust from memory
//! - **Forgiving dates**: ISO, dotted, Korean (`2025년 11월 3일`), month-first and
//!   month-name dates; anything unreadable is simply skipped
//! - **Single target year**: inferred as the most recent year in the sheet unless given
//! - **Widget payload**: serializable month views, display options and legend for a
//!   month-grid calendar widget, plus click-detail decoding
//! - **Upload cache**: repeated loads of the same upload reuse the decoded table
//!
//! ## Example
//!
//! ```no_run
//! use admission_calendar::{Config, Session, Upload};
//!
//! let upload = Upload::read_from(std::fs::File::open("results.xlsx")?, "results.xlsx")?;
//! let mut session = Session::new(Config::default());
//! let page = session.open(&upload)?;
//! println!("{}", serde_json::to_string(&page)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calendar;
pub mod config;
pub mod error;
mod helpers;
pub mod schedule;
pub mod session;
pub mod spreadsheet;

pub use calendar::click_detail;
pub use calendar::CalendarPage;
pub use config::Config;
pub use error::AdmissionCalendarError;
pub use schedule::build_events;
pub use schedule::Event;
pub use session::Session;
pub use session::Upload;
pub use session::UploadCache;
pub use spreadsheet::read_table;
pub use spreadsheet::Table;
