//! Upload handling: bytes are read once, decoded tables are memoized per upload.

use crate::calendar::legend;
use crate::calendar::render_page;
use crate::calendar::CalendarPage;
use crate::config::Config;
use crate::error::AdmissionCalendarError;
use crate::schedule::BuildReport;
use crate::spreadsheet::read_table;
use crate::spreadsheet::Table;
use log::debug;
use sha2::Digest;
use sha2::Sha256;
use std::io::Read;
use std::sync::Arc;

/// An uploaded file: its name and immutable contents. Clones share the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    name: String,
    bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Drains `reader` once into memory.
    pub fn read_from<R: Read>(mut reader: R, name: impl Into<String>) -> Result<Self, AdmissionCalendarError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Upload::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    fn digest(&self) -> [u8; 32] {
        Sha256::digest(&self.bytes).into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CacheKey {
    digest: [u8; 32],
    name: String,
    header_row: usize,
}

/// Single-entry memo of the last decoded upload.
///
/// A load with the same content, file name and header row returns the cached table;
/// anything else decodes again and replaces the entry.
#[derive(Debug, Default)]
pub struct UploadCache {
    entry: Option<(CacheKey, Arc<Table>)>,
    loads: usize,
}

impl UploadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, upload: &Upload, header_row: usize) -> Result<Arc<Table>, AdmissionCalendarError> {
        let key = CacheKey {
            digest: upload.digest(),
            name: upload.name.clone(),
            header_row,
        };
        if let Some((cached, table)) = &self.entry {
            if *cached == key {
                debug!("cache hit for '{}'", upload.name);
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(read_table(Arc::clone(&upload.bytes), &upload.name, header_row)?);
        self.loads += 1;
        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    /// Number of decodes performed, cache hits excluded
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Configuration plus the upload cache for one user of the calendar.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    cache: UploadCache,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            config,
            cache: UploadCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    /// Decodes (or reuses) the upload and builds its events.
    pub fn report(&mut self, upload: &Upload) -> Result<BuildReport, AdmissionCalendarError> {
        let table = self.cache.load(upload, self.config.header_row)?;
        Ok(self.config.event_builder().build(&table, self.config.target_year))
    }

    /// Calendar page for the upload: one month view per configured month.
    pub fn open(&mut self, upload: &Upload) -> Result<CalendarPage, AdmissionCalendarError> {
        let report = self.report(upload)?;
        let mut page = render_page(
            &report.events,
            report.target_year,
            &self.config.months,
            &self.config.locale,
            legend(&self.config.interview_keyword, &self.config.essay_keyword),
        );
        page.skipped_rows = report.skipped.len();
        Ok(page)
    }
}
