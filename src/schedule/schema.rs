use crate::spreadsheet::cell_of;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Zero-based positions of the fields an admission row is read from.
///
/// Defaults follow the exported results sheet: A class, B name, D institution,
/// N category, O screening date, P stage-one result, Q final result, V auxiliary note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSchema {
    pub class: usize,
    pub name: usize,
    pub institution: usize,
    pub category: usize,
    pub screening: usize,
    pub stage_one: usize,
    pub final_result: usize,
    pub auxiliary: usize,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        ColumnSchema {
            class: 0,
            name: 1,
            institution: 3,
            category: 13,
            screening: 14,
            stage_one: 15,
            final_result: 16,
            auxiliary: 21,
        }
    }
}

impl ColumnSchema {
    /// Field names paired with their column positions
    pub fn fields(&self) -> [(&'static str, usize); 8] {
        [
            ("class", self.class),
            ("name", self.name),
            ("institution", self.institution),
            ("category", self.category),
            ("screening", self.screening),
            ("stage_one", self.stage_one),
            ("final_result", self.final_result),
            ("auxiliary", self.auxiliary),
        ]
    }

    /// Screening, stage-one and final-result columns, in event order
    pub fn date_columns(&self) -> [usize; 3] {
        [self.screening, self.stage_one, self.final_result]
    }

    /// Minimum table width that can hold every field
    pub fn required_width(&self) -> usize {
        self.fields().iter().map(|(_, index)| index + 1).max().unwrap_or(0)
    }

    /// Resolves a record against the schema. Rows of a table too narrow for the schema
    /// cannot be addressed and are skipped.
    pub fn resolve<'a>(&self, record: &'a [Option<String>], width: usize) -> Result<SourceRow<'a>, SkipReason> {
        if let Some((field, index)) = self.fields().into_iter().find(|(_, index)| *index >= width) {
            return Err(SkipReason::MissingColumn { field, index, width });
        }
        Ok(SourceRow {
            class: cell_of(record, self.class),
            name: cell_of(record, self.name),
            institution: cell_of(record, self.institution),
            category: cell_of(record, self.category),
            screening: cell_of(record, self.screening),
            stage_one: cell_of(record, self.stage_one),
            final_result: cell_of(record, self.final_result),
            auxiliary: cell_of(record, self.auxiliary),
        })
    }
}

/// One data record with its fields looked up by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceRow<'a> {
    pub class: Option<&'a str>,
    pub name: Option<&'a str>,
    pub institution: Option<&'a str>,
    pub category: Option<&'a str>,
    pub screening: Option<&'a str>,
    pub stage_one: Option<&'a str>,
    pub final_result: Option<&'a str>,
    pub auxiliary: Option<&'a str>,
}

/// Why a row produced no events
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    #[error("column '{field}' at index {index} is outside a table {width} columns wide")]
    MissingColumn {
        field: &'static str,
        index: usize,
        width: usize,
    },
}
