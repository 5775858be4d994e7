//! Settings for reading an upload and laying out its calendar, loaded from TOML.
//!
//! ```toml
//! header_row = 3
//! months = [10, 11, 12]
//! interview_keyword = "면접"
//!
//! [columns]
//! auxiliary = 21
//! ```

use crate::schedule::ColumnSchema;
use crate::schedule::EventBuilder;
use crate::schedule::ESSAY_KEYWORD;
use crate::schedule::INTERVIEW_KEYWORD;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    ReadError(String, std::io::Error),

    #[error("Failed to parse config file '{0}': {1}")]
    ParseError(String, toml::de::Error),

    #[error("Invalid month '{0}' (expected 1 to 12)")]
    InvalidMonth(u32),

    #[error("Header row must be 1 or greater")]
    InvalidHeaderRow,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 1-based row holding the column headers
    pub header_row: usize,
    /// Months shown, in display order
    pub months: Vec<u32>,
    /// Widget locale
    pub locale: String,
    pub interview_keyword: String,
    pub essay_keyword: String,
    /// Fixed year of displayed events; inferred from the upload when unset
    pub target_year: Option<i32>,
    pub columns: ColumnSchema,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_row: 3,
            months: vec![10, 11, 12],
            locale: "ko".to_owned(),
            interview_keyword: INTERVIEW_KEYWORD.to_owned(),
            essay_keyword: ESSAY_KEYWORD.to_owned(),
            target_year: None,
            columns: ColumnSchema::default(),
        }
    }
}

impl Config {
    /// Loads and validates a config file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError(source.clone(), e))?;
        Self::parse(&contents, &source)
    }

    /// Parses and validates TOML text; `source` names it in errors.
    pub fn parse(contents: &str, source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|e| ConfigError::ParseError(source.to_owned(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header_row == 0 {
            return Err(ConfigError::InvalidHeaderRow);
        }
        if let Some(month) = self.months.iter().find(|month| !(1..=12).contains(*month)) {
            return Err(ConfigError::InvalidMonth(*month));
        }
        Ok(())
    }

    pub fn event_builder(&self) -> EventBuilder {
        EventBuilder {
            schema: self.columns,
            interview_keyword: self.interview_keyword.clone(),
            essay_keyword: self.essay_keyword.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() -> Result<(), ConfigError> {
        assert_eq!(Config::parse("", "test")?, Config::default());
        Ok(())
    }

    #[test]
    fn overrides_selected_keys() -> Result<(), ConfigError> {
        let config = Config::parse(
            r#"
                header_row = 1
                months = [9, 10]
                target_year = 2026
                essay_keyword = "essay"

                [columns]
                auxiliary = 4
            "#,
            "test",
        )?;
        assert_eq!(config.header_row, 1);
        assert_eq!(config.months, vec![9, 10]);
        assert_eq!(config.target_year, Some(2026));
        assert_eq!(config.interview_keyword, "면접");
        assert_eq!(config.columns.auxiliary, 4);
        assert_eq!(config.columns.screening, 14);
        assert_eq!(config.event_builder().essay_keyword, "essay");
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(Config::parse("months = [10, 13]", "test"), Err(ConfigError::InvalidMonth(13))));
        assert!(matches!(Config::parse("header_row = 0", "test"), Err(ConfigError::InvalidHeaderRow)));
        assert!(matches!(Config::parse("colour = 1", "test"), Err(ConfigError::ParseError(..))));
        assert!(matches!(Config::parse("months = \"oct\"", "test"), Err(ConfigError::ParseError(..))));
    }

    #[test]
    fn missing_file() {
        let error = Config::load(Path::new("/nonexistent/admission-calendar.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::ReadError(..)));
        assert!(error.to_string().contains("/nonexistent/admission-calendar.toml"));
    }
}
