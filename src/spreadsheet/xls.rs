use crate::error::AdmissionCalendarError;
use crate::error::ResultOptionChain;
use crate::helpers::biff8::Biff8Reader;
use crate::helpers::cfb::Cfb;
use crate::match_biff8_record;
use crate::spreadsheet::cell::to_error_value;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::excel::load_number_formats;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use either::Either;
use std::collections::HashMap;
use thiserror::Error;

// BIFF8 record type identifiers
const FORMULA: u16 = 6;        // Formula record with its cached result
const EOF: u16 = 10;           // End of a substream
const DATE1904: u16 = 34;      // Date system flag (1904 vs 1900 base)
const FILE_PASS: u16 = 47;     // Encryption header
const BOUND_SHEET8: u16 = 133; // Sheet name, kind, and stream position
const MUL_RK: u16 = 189;       // Run of RK numbers on one row
const XF: u16 = 224;           // Extended format (cell style)
const SST: u16 = 252;          // Shared string table
const LABEL_SST: u16 = 253;    // Cell referencing the shared string table
const NUMBER: u16 = 515;       // IEEE double cell
const LABEL: u16 = 516;        // Inline string cell
const BOOL_ERR: u16 = 517;     // Boolean or error cell
const STRING: u16 = 519;       // String result of the preceding formula
const RK: u16 = 638;           // Compressed number cell
const FORMAT: u16 = 1054;      // Custom number format definition
const BOF: u16 = 2057;         // Start of a substream

const BIFF8_VERSION: u16 = 0x0600;
const WORKSHEET: u8 = 0;

#[derive(Error, Debug)]
pub enum XlsError {
    #[error("Invalid Formula value '{0}'")]
    FormulaValueError(u64),
}

/// Excel 97-2003 workbook with its global records already decoded
pub(crate) struct XlsSpreadsheet {
    name: String,
    reader: Biff8Reader,
    shared_strings: Vec<String>,
    /// Cell type implied by each XF index
    number_formats: Vec<CellType>,
    /// Worksheets with the stream offset of their BOF record
    sheets: Vec<(String, usize)>,
}

impl XlsSpreadsheet {
    /// Reads the workbook globals substream: date system, formats, styles, strings and sheets
    ///
    /// # Arguments
    /// * `bytes` - Complete contents of the uploaded file
    /// * `file_name` - Upload name, used in error messages
    ///
    /// # Returns
    /// Result containing the initialized XlsSpreadsheet. Files this decoder cannot handle
    /// (not a compound file, no BIFF8 `Workbook` stream) are reported as
    /// [`SpreadsheetError::LegacyFormat`].
    pub(crate) fn open(bytes: &[u8], file_name: &str) -> Result<XlsSpreadsheet, AdmissionCalendarError> {
        let legacy = |reason: &str| SpreadsheetError::LegacyFormat(file_name.to_owned(), reason.to_owned());
        if !Cfb::is_compound_file(bytes) {
            Err(legacy("not an OLE compound file"))?
        }
        let cfb = Cfb::new(bytes).map_err(|error| legacy(&error.to_string()))?;
        let mut reader = cfb
            .read("Workbook")
            .ok_none_else(|| cfb.read("Book"))?
            .map(Biff8Reader::new)
            .ok_or_else(|| legacy("no Workbook stream"))?;
        if reader.next()? != Some(BOF) {
            Err(legacy("Workbook stream does not start with BOF"))?
        }
        let version = reader.read_u16()?;
        if version != BIFF8_VERSION {
            Err(legacy(&format!("BIFF version {version:#06x} predates Excel 97")))?
        }

        let mut is_1904 = false;
        let mut shared_strings = Vec::new();
        let mut custom_formats: HashMap<String, CellType> = HashMap::new();
        let mut format_indexes: Vec<String> = Vec::new();
        let mut sheets: Vec<(String, usize)> = Vec::new();
        match_biff8_record!(reader => {
            EOF => break,
            FILE_PASS => Err(SpreadsheetError::PasswordProtected(file_name.to_owned()))?,
            DATE1904 if reader.read_u16()? == 1 => is_1904 = true,
            FORMAT => {
                let id = reader.read_u16()?;
                let format = reader.read_xl_unicode_string()?;
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
            XF => {
                reader.skip(2)?;
                let id = reader.read_u16()?;
                format_indexes.push(id.to_string());
            }
            SST => shared_strings = load_shared_strings(&mut reader)?,
            BOUND_SHEET8 => {
                let pointer = reader.read_usize()?;
                reader.skip(1)?;
                let kind = reader.read_u8()?;
                let sheet_name = reader.read_short_xl_unicode_string()?;
                if kind == WORKSHEET {
                    sheets.push((sheet_name, pointer));
                }
            }
        });
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook(file_name.to_owned()))?
        }

        // DATE1904 may follow FORMAT records, so classify custom formats again with the final flag
        if is_1904 {
            for kind in custom_formats.values_mut() {
                *kind = to_1904(*kind);
            }
        }
        let number_formats = load_number_formats(format_indexes, custom_formats, is_1904);
        Ok(XlsSpreadsheet {
            name: file_name.to_owned(),
            reader,
            shared_strings,
            number_formats,
            sheets,
        })
    }

    fn number_format(&self, index: usize) -> CellType {
        self.number_formats.get(index).copied().unwrap_or(CellType::Number)
    }
}

impl Spreadsheet for XlsSpreadsheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_shared_strings(&mut self) -> Result<Vec<String>, AdmissionCalendarError> {
        Ok(std::mem::take(&mut self.shared_strings))
    }

    /// Walks the first worksheet substream from its BOF record to EOF
    ///
    /// # Returns
    /// Sheet with one cell per value record; MULRK records expand to one cell per column
    fn read_first_sheet(&mut self) -> Result<Sheet, AdmissionCalendarError> {
        let Some((sheet_name, pointer)) = self.sheets.first().cloned() else {
            return Err(SpreadsheetError::EmptyWorkbook(self.name.clone()).into());
        };
        let mut sheet = Sheet::new(&sheet_name);
        self.reader.goto(pointer);
        self.reader.next()?;
        while let Some(tag) = self.reader.next()? {
            match tag {
                BOF | EOF => break,
                MUL_RK => {
                    let row = self.reader.read_u16()? as usize;
                    let col_lower_bound = self.reader.read_u16()? as usize;
                    let col_upper_bound = self.reader.last_u16()? as usize;
                    for col in col_lower_bound..=col_upper_bound {
                        let index = self.reader.read_u16()? as usize;
                        let value = self.reader.read_rk_number()?;
                        sheet.push(Cell {
                            row,
                            col,
                            kind: self.number_format(index),
                            value,
                        });
                    }
                }
                BOOL_ERR | NUMBER | RK | LABEL_SST | LABEL | FORMULA => {
                    let row = self.reader.read_u16()? as usize;
                    let col = self.reader.read_u16()? as usize;
                    let (either, value) = match tag {
                        BOOL_ERR => read_bool_or_error_cell(&mut self.reader)?,
                        NUMBER => read_number_cell(&mut self.reader)?,
                        RK => read_rk_cell(&mut self.reader)?,
                        LABEL_SST => read_label_sst_cell(&mut self.reader)?,
                        LABEL => read_label_cell(&mut self.reader)?,
                        _ => read_formula_cell(&mut self.reader)?,
                    };
                    let kind = match either {
                        Either::Left(kind) => kind,
                        Either::Right(index) => self.number_format(index),
                    };
                    if kind != CellType::Error && !value.is_empty() {
                        sheet.push(Cell { row, col, kind, value });
                    }
                }
                _ => (),
            }
        }
        Ok(sheet)
    }
}

fn to_1904(kind: CellType) -> CellType {
    match kind {
        CellType::NumberDate1900 => CellType::NumberDate1904,
        CellType::NumberDateTime1900 => CellType::NumberDateTime1904,
        CellType::NumberTime1900 => CellType::NumberTime1904,
        kind => kind,
    }
}

fn load_shared_strings(reader: &mut Biff8Reader) -> Result<Vec<String>, AdmissionCalendarError> {
    reader.skip(4)?;
    let count = reader.read_usize()?;
    let mut shared_strings: Vec<String> = Vec::with_capacity(count.min(65_536));
    for _ in 0..count {
        shared_strings.push(reader.read_xl_unicode_rich_extended_string()?);
    }
    Ok(shared_strings)
}

/// A cell's type is either known outright or an XF index to resolve
type CellValue = (Either<CellType, usize>, String);

fn read_bool_or_error_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    reader.skip(2)?;
    let value = reader.read_u8()?;
    let flag = reader.read_u8()?;
    if flag == 0 {
        Ok((Either::Left(CellType::Boolean), value.to_string()))
    } else {
        Ok((Either::Left(CellType::Error), to_error_value(value).to_owned()))
    }
}

fn read_number_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    let index = reader.read_u16()? as usize;
    let value = reader.read_f64()?;
    Ok((Either::Right(index), value.to_string()))
}

fn read_rk_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    let index = reader.read_u16()? as usize;
    let value = reader.read_rk_number()?;
    Ok((Either::Right(index), value))
}

fn read_label_sst_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    reader.skip(2)?;
    let value = reader.read_usize()?;
    Ok((Either::Left(CellType::SharedString), value.to_string()))
}

fn read_label_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    reader.skip(2)?;
    let value = reader.read_xl_unicode_string()?;
    Ok((Either::Left(CellType::InlineString), value))
}

/// Decodes the cached result of a FORMULA record; string results arrive in the next STRING record
fn read_formula_cell(reader: &mut Biff8Reader) -> Result<CellValue, AdmissionCalendarError> {
    let index = reader.read_u16()? as usize;
    let formula = reader.read_u64()?;
    let is_number = (formula & 0xFFFF_0000_0000_0000) != 0xFFFF_0000_0000_0000;
    let flag = formula & 0xFF;
    if is_number {
        Ok((Either::Right(index), f64::from_bits(formula).to_string()))
    } else if flag == 0 {
        match reader.next()? {
            Some(STRING) => {
                let value = reader.read_xl_unicode_string()?;
                Ok((Either::Left(CellType::InlineString), value))
            }
            _ => Err(XlsError::FormulaValueError(formula))?,
        }
    } else if flag == 1 {
        let value = if (formula & 0xFF_0000) > 0 { "1" } else { "0" };
        Ok((Either::Left(CellType::Boolean), value.to_owned()))
    } else if flag == 2 {
        let code = ((formula >> 16) & 0xFF) as u8;
        Ok((Either::Left(CellType::Error), to_error_value(code).to_owned()))
    } else if flag == 3 {
        Ok((Either::Left(CellType::InlineString), String::new()))
    } else {
        Err(XlsError::FormulaValueError(formula))?
    }
}
