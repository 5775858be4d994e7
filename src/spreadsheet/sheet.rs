use crate::spreadsheet::cell::Cell;

/// Cells decoded from one worksheet, in the order the file stores them.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    pub(crate) cells: Vec<Cell>,
    /// Highest row index seen
    pub(crate) row_upper_bound: Option<usize>,
    /// Highest column index seen
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    pub(super) fn push(&mut self, cell: Cell) {
        self.row_upper_bound = self.row_upper_bound.max(Some(cell.row));
        self.col_upper_bound = self.col_upper_bound.max(Some(cell.col));
        self.cells.push(cell);
    }

    /// Lays the cells out as rows of text starting at `A1`.
    ///
    /// Each record ends at its last stored cell; gaps and cells without a textual value
    /// are `None`. A later cell at the same position replaces an earlier one.
    pub(crate) fn to_records(&self, shared_strings: &[String]) -> Vec<Vec<Option<String>>> {
        let Some(rows) = self.row_upper_bound else {
            return Vec::new();
        };
        let mut records: Vec<Vec<Option<String>>> = vec![Vec::new(); rows + 1];
        for cell in &self.cells {
            let record = &mut records[cell.row];
            if record.len() <= cell.col {
                record.resize(cell.col + 1, None);
            }
            record[cell.col] = cell.to_text(shared_strings);
        }
        records
    }
}
