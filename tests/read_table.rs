mod common;

use admission_calendar::read_table;
use admission_calendar::spreadsheet::SpreadsheetError;
use admission_calendar::AdmissionCalendarError;
use common::application;
use common::preamble;
use common::xlsx;
use common::Cell;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn bytes(rows: &[Vec<Cell>]) -> Arc<[u8]> {
    Arc::from(xlsx(rows))
}

#[test]
fn header_row_three_splits_records() -> Result<(), AdmissionCalendarError> {
    let mut rows = preamble();
    rows.push(application("31201", "김하늘", "서울대학교", "학생부종합(면접)", [Cell::Text("2025-11-15"), Cell::Empty, Cell::Empty], "메모"));
    rows.push(vec![]);
    rows.push(application("31305", "이바다", "고려대학교", "논술우수자", [Cell::Empty, Cell::Empty, Cell::Empty], ""));

    let table = read_table(bytes(&rows), "results.xlsx", 3)?;
    assert_eq!(table.sheet_name, "수시");
    assert_eq!(table.header()[0], "학번");
    assert_eq!(table.header()[21], "수능최저");
    assert_eq!(table.width(), 22);
    assert_eq!(table.len(), 3);
    assert_eq!(table.cell(0, 1), Some("김하늘"));
    assert_eq!(table.cell(0, 14), Some("2025-11-15"));
    assert_eq!(table.cell(0, 21), Some("메모"));
    assert!(table.records()[1].iter().all(Option::is_none));
    assert_eq!(table.cell(2, 3), Some("고려대학교"));
    Ok(())
}

#[test]
fn date_formatted_numbers_arrive_as_iso_text() -> Result<(), AdmissionCalendarError> {
    let mut rows = preamble();
    rows.push(application(
        "31201",
        "김하늘",
        "서울대학교",
        "면접",
        [Cell::Date(45964.0), Cell::KoreanDate(45931.0), Cell::Number(46003.0)],
        "",
    ));
    let table = read_table(bytes(&rows), "results.xlsx", 3)?;
    assert_eq!(table.cell(0, 14), Some("2025-11-03"));
    assert_eq!(table.cell(0, 15), Some("2025-10-01"));
    assert_eq!(table.cell(0, 16), Some("46003"));
    Ok(())
}

#[test]
fn shared_strings_are_resolved() -> Result<(), AdmissionCalendarError> {
    let mut rows = preamble();
    rows.push(vec![Cell::Shared("31201"), Cell::Shared("김하늘"), Cell::Empty, Cell::Shared("김하늘")]);
    let table = read_table(bytes(&rows), "RESULTS.XLSX", 3)?;
    assert_eq!(table.cell(0, 0), Some("31201"));
    assert_eq!(table.cell(0, 1), Some("김하늘"));
    assert_eq!(table.cell(0, 3), Some("김하늘"));
    Ok(())
}

#[test]
fn header_row_is_configurable() -> Result<(), AdmissionCalendarError> {
    let rows = vec![vec![Cell::Text("반"), Cell::Text("이름")], vec![Cell::Text("31201"), Cell::Text("김하늘")]];
    let table = read_table(bytes(&rows), "results.xlsx", 1)?;
    assert_eq!(table.header(), ["반", "이름"]);
    assert_eq!(table.cell(0, 1), Some("김하늘"));
    Ok(())
}

#[test]
fn sheet_shorter_than_header_row() {
    let rows = vec![vec![Cell::Text("only one row")]];
    let error = read_table(bytes(&rows), "results.xlsx", 3).unwrap_err();
    assert!(matches!(
        error.as_spreadsheet_error(),
        Some(SpreadsheetError::MissingHeaderRow(sheet, 3)) if sheet == "수시"
    ));
}

#[test]
fn unsupported_extension() {
    let error = read_table(bytes(&preamble()), "results.csv", 3).unwrap_err();
    assert!(matches!(error.as_spreadsheet_error(), Some(SpreadsheetError::UnsupportedFormat(_))));
}

#[test]
fn xls_that_is_not_a_compound_file() {
    // An .xlsx package renamed to .xls
    let error = read_table(bytes(&preamble()), "results.xls", 3).unwrap_err();
    assert!(matches!(error.as_spreadsheet_error(), Some(SpreadsheetError::LegacyFormat(..))));
}

#[test]
fn corrupt_package_names_the_file() {
    let error = read_table(Arc::from(b"definitely not a zip".to_vec()), "broken.xlsx", 3).unwrap_err();
    assert!(error.to_string().starts_with("broken.xlsx: "));
}
