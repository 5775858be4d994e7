use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as `0`/`1`
    Boolean,
    /// Numeric values without a date/time format
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings (`t="d"` cells)
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    fn date_time(is_1904: bool) -> Self {
        if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }
    }

    fn date(is_1904: bool) -> Self {
        if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }
    }

    fn time(is_1904: bool) -> Self {
        if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }
    }

    /// Maps built-in Excel number format IDs to a cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(Self::date_time(is_1904)),
            "14" | "15" | "16" | "17" => Some(Self::date(is_1904)),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::time(is_1904)),
            // East Asian locale date formats (e.g. `yyyy"년" m"월" d"일"`)
            "27" | "28" | "29" | "30" | "31" | "34" | "35" | "36" | "50" | "51" | "52" | "53"
            | "54" | "55" | "56" | "57" | "58" => Some(Self::date(is_1904)),
            _ => None,
        }
    }

    /// Classifies a custom number format code by the date/time tokens it contains,
    /// ignoring quoted literals, escapes, and bracketed sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '"' => is_literal = !is_literal,
                _ if is_literal => (),
                '_' | '\\' => is_escaped = true,
                '[' => is_bracket = true,
                ']' => is_bracket = false,
                _ if is_bracket => (),
                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time) {
            (true, true) => Self::date_time(is_1904),
            (true, false) => Self::date(is_1904),
            (false, true) => Self::time(is_1904),
            (false, false) => Self::Number,
        }
    }
}

/// Converts Excel error codes to their display strings.
#[cfg(feature = "xls")]
pub(crate) fn to_error_value(value: u8) -> &'static str {
    match value {
        0x00 => "#NULL!",
        0x07 => "#DIV/0!",
        0x0F => "#VALUE!",
        0x17 => "#REF!",
        0x1D => "#NAME?",
        0x24 => "#NUM!",
        0x2A => "#N/A",
        0x2B => "#GETTING_DATA",
        _ => "#ERROR!",
    }
}

/// A single decoded cell with its position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw value; for shared strings this is the table index
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Renders the cell as text the way a user would read it in Excel.
    ///
    /// Date-formatted numbers become `YYYY-MM-DD` (or `YYYY-MM-DD HH:MM:SS` when they carry a
    /// time), so downstream date parsing never has to interpret serial numbers. Errors and
    /// empty values yield `None`.
    pub(crate) fn to_text(&self, shared_strings: &[String]) -> Option<String> {
        let text = match self.kind {
            CellType::Empty | CellType::Error => return None,
            CellType::SharedString => {
                let index = self.value.parse::<usize>().ok()?;
                shared_strings.get(index)?.to_owned()
            }
            CellType::Boolean => if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned(),
            CellType::NumberDate1900 => to_date_string(&self.value, false).unwrap_or_else(|| self.value.to_owned()),
            CellType::NumberDate1904 => to_date_string(&self.value, true).unwrap_or_else(|| self.value.to_owned()),
            CellType::NumberDateTime1900 => to_datetime_string(&self.value, false).unwrap_or_else(|| self.value.to_owned()),
            CellType::NumberDateTime1904 => to_datetime_string(&self.value, true).unwrap_or_else(|| self.value.to_owned()),
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                to_time_string(&self.value).unwrap_or_else(|| self.value.to_owned())
            }
            CellType::IsoDateTime => self.value.replace('T', " "),
            CellType::Number | CellType::InlineString => self.value.to_owned(),
        };
        Some(text).filter(|text| !text.is_empty())
    }
}

/// Converts an Excel serial day number to an ISO date string.
/// The 1900 system counts the nonexistent 1900-02-29, so serials before 60 shift by one.
fn to_date_string(value: &str, is_1904: bool) -> Option<String> {
    let days = value.parse::<f64>().ok()?.trunc();
    if !days.is_finite() || days.abs() > 3_000_000.0 {
        return None;
    }
    let days = days as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::days(days + offset))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Converts the fractional part of an Excel serial to `HH:MM:SS`.
fn to_time_string(value: &str) -> Option<String> {
    let fraction = value.parse::<f64>().ok()?.fract().abs();
    let mut seconds = (fraction * 86_400f64).round() as i64;
    let hours = seconds / 3600;
    seconds %= 3600;
    let minutes = seconds / 60;
    seconds %= 60;
    Some(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}

fn to_datetime_string(value: &str, is_1904: bool) -> Option<String> {
    let date = to_date_string(value, is_1904)?;
    let time = to_time_string(value)?;
    Some(format!("{date} {time}"))
}
