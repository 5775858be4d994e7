use crate::schedule::date::parse_date_in;
use crate::spreadsheet::Table;
use chrono::Datelike;
use chrono::Local;

/// Most recent year found in the given date columns, or the current year when none parse.
pub fn infer_year(table: &Table, date_columns: &[usize]) -> i32 {
    infer_year_or(table, date_columns, Local::now().year())
}

/// Most recent year found in the given date columns, or `fallback` when none parse.
/// Year-less cells count as `fallback`.
pub fn infer_year_or(table: &Table, date_columns: &[usize], fallback: i32) -> i32 {
    date_columns
        .iter()
        .flat_map(|col| table.column(*col))
        .filter_map(|cell| parse_date_in(cell, fallback))
        .map(|date| date.year())
        .max()
        .unwrap_or(fallback)
}
