//! # Spreadsheet Reading
//!
//! Decodes an uploaded workbook into a [`Table`] of text cells. Excel 2007+ packages
//! (.xlsx, .xlsm) are read from their Open XML parts; Excel 97-2003 workbooks (.xls)
//! are read from the BIFF8 `Workbook` stream when the `xls` feature is enabled.
//! Only the first worksheet is read.

mod cell;
mod excel;
mod reference;
mod sheet;
mod table;
#[cfg(feature = "xls")]
pub(crate) mod xls;
mod xlsx;

pub use table::cell_of;
pub use table::Record;
pub use table::Table;

use crate::error::AdmissionCalendarError;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use log::debug;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

/// Seekable reader over upload bytes held in memory
pub(crate) type ByteReader = Cursor<Arc<[u8]>>;

/// Errors raised while opening or decoding a workbook
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported file extension for '{0}': upload an .xlsx or .xls file")]
    UnsupportedFormat(String),

    #[error("Cannot read legacy Excel file '{0}' ({1}). Save the file as .xlsx and upload it again")]
    LegacyFormat(String, String),

    #[error("Spreadsheet '{0}' is password protected")]
    PasswordProtected(String),

    #[error("Spreadsheet '{0}' has no worksheet")]
    EmptyWorkbook(String),

    #[error("Missing part '{0}' in workbook package")]
    MissingPart(String),

    #[error("Header row must be 1 or greater, got {0}")]
    InvalidHeaderRow(usize),

    #[error("Worksheet '{0}' has no row {1} to use as header")]
    MissingHeaderRow(String, usize),
}

/// Workbook engines, chosen by file extension
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Office Open XML package (.xlsx, .xlsm)
    Xlsx,
    /// Excel 97-2003 binary workbook (.xls)
    Xls,
}

impl SpreadsheetFormat {
    /// Detects the engine from the text after the last `.`, ignoring case.
    pub fn detect(file_name: &str) -> Result<Self, SpreadsheetError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(Self::Xlsx),
            Some("xls") => Ok(Self::Xls),
            _ => Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned())),
        }
    }
}

/// Common interface of the workbook engines
pub(crate) trait Spreadsheet {
    fn name(&self) -> &str;

    /// Loads the workbook's shared string table
    fn load_shared_strings(&mut self) -> Result<Vec<String>, AdmissionCalendarError>;

    /// Decodes every cell of the first worksheet
    fn read_first_sheet(&mut self) -> Result<Sheet, AdmissionCalendarError>;
}

fn open_spreadsheet(bytes: Arc<[u8]>, file_name: &str) -> Result<Box<dyn Spreadsheet>, AdmissionCalendarError> {
    match SpreadsheetFormat::detect(file_name)? {
        SpreadsheetFormat::Xlsx => Ok(Box::new(XlsxSpreadsheet::open(bytes, file_name)?)),
        SpreadsheetFormat::Xls => open_legacy(bytes, file_name),
    }
}

#[cfg(feature = "xls")]
fn open_legacy(bytes: Arc<[u8]>, file_name: &str) -> Result<Box<dyn Spreadsheet>, AdmissionCalendarError> {
    Ok(Box::new(xls::XlsSpreadsheet::open(&bytes, file_name)?))
}

#[cfg(not(feature = "xls"))]
fn open_legacy(_bytes: Arc<[u8]>, file_name: &str) -> Result<Box<dyn Spreadsheet>, AdmissionCalendarError> {
    Err(SpreadsheetError::LegacyFormat(
        file_name.to_owned(),
        "this build has no .xls decoder".to_owned(),
    ))?
}

/// Reads the first worksheet of an uploaded workbook into a [`Table`].
///
/// # Arguments
/// * `bytes` - Upload contents, read once and shared with the decoder
/// * `file_name` - Upload name; its extension selects the decoder
/// * `header_row` - 1-based header row. Rows above it are ignored and rows below it
///   become data records
///
/// # Returns
/// The table, or an error when the format is unsupported or the file cannot be decoded
pub fn read_table(bytes: Arc<[u8]>, file_name: &str, header_row: usize) -> Result<Table, AdmissionCalendarError> {
    if header_row == 0 {
        Err(SpreadsheetError::InvalidHeaderRow(header_row))?;
    }
    let mut spreadsheet = open_spreadsheet(bytes, file_name)?;
    let shared_strings = spreadsheet.load_shared_strings()?;
    let sheet = spreadsheet.read_first_sheet()?;
    debug!(
        "decoded sheet '{}' of '{}': {} cells, last cell {}",
        sheet.name,
        spreadsheet.name(),
        sheet.cells.len(),
        sheet.cells.last().map(|cell| cell.reference()).unwrap_or_default(),
    );

    let rows = sheet.to_records(&shared_strings);
    let table = Table::from_rows(&sheet.name, rows, header_row)
        .ok_or_else(|| SpreadsheetError::MissingHeaderRow(sheet.name.clone(), header_row))?;
    debug!("table '{}': {} records, width {}", table.sheet_name, table.len(), table.width());
    Ok(table)
}
