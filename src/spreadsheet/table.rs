/// One data row: cell text by zero-based column, `None` where the cell is empty.
pub type Record = Vec<Option<String>>;

/// A worksheet reduced to a header row and text records.
///
/// Records may be shorter than [`Table::width`]; positions past their end read as absent.
/// The width is the widest of the header and all records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Worksheet the table was read from
    pub sheet_name: String,
    header: Vec<String>,
    records: Vec<Record>,
    width: usize,
}

impl Table {
    /// Builds a table, dropping trailing records that hold no value at all.
    pub fn new(sheet_name: impl Into<String>, header: Vec<String>, mut records: Vec<Record>) -> Self {
        while records.last().is_some_and(|record| record.iter().all(Option::is_none)) {
            records.pop();
        }
        let width = records
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        Table {
            sheet_name: sheet_name.into(),
            header,
            records,
            width,
        }
    }

    /// Splits raw worksheet rows at a 1-based header row: rows above it are discarded,
    /// the header row names the columns, and everything below is data.
    pub(crate) fn from_rows(sheet_name: &str, mut rows: Vec<Record>, header_row: usize) -> Option<Self> {
        if header_row == 0 || rows.len() < header_row {
            return None;
        }
        let records = rows.split_off(header_row);
        let header = rows
            .pop()
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        Some(Table::new(sheet_name, header, records))
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell text at a data row and column, `None` when empty or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.records.get(row).and_then(|record| cell_of(record, col))
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.records.iter().map(move |record| cell_of(record, col))
    }
}

/// Cell text of a record, `None` when empty or past its end.
pub fn cell_of(record: &[Option<String>], col: usize) -> Option<&str> {
    record.get(col).and_then(Option::as_deref)
}
