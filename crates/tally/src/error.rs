// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use thiserror::Error;
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Ingestion error: {0}")]
    Ingestion(#[from] IngestionError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
}
/// Fatal at startup: the dashboard cannot run without a valid dataset.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read data source '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV input: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("Failed to coerce column values: {source}")]
    Frame {
        #[from]
        source: polars::error::PolarsError,
    },
    #[error("Required column '{column}' not found in data source")]
    MissingColumn { column: String },
    #[error("Data source has no header row")]
    MissingHeader,
    #[error("Dataset already initialised for this process")]
    AlreadyInitialised,
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid dashboard configuration: {field} = {value}")]
    InvalidValue { field: String, value: String },
    #[error("Missing required configuration: {field}")]
    MissingRequiredConfig { field: String },
}
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter field '{field}'")]
    UnknownField { field: String },
    #[error("Invalid value '{value}' for filter '{field}'")]
    InvalidValue { field: String, value: String },
    #[error("Filter change must look like field=value, got '{input}'")]
    MalformedChange { input: String },
}
#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
}
pub type Result<T> = std::result::Result<T, TallyError>;
pub type IngestionResult<T> = std::result::Result<T, IngestionError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type FilterResult<T> = std::result::Result<T, FilterError>;
impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}
impl TallyError {
    /// Filter mistakes leave the session usable; everything else is an
    /// operator problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TallyError::Filter(_))
    }
    pub fn category(&self) -> &'static str {
        match self {
            TallyError::Ingestion(_) => "Ingestion",
            TallyError::Config(_) => "Configuration",
            TallyError::Filter(_) => "Filter",
            TallyError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            TallyError::Ingestion(IngestionError::MissingColumn { .. }) => vec![
                "Check the CSV header row for the exact column names".to_string(),
                "Required: Age, Gender, Medical Condition, Insurance Provider, Billing Amount, Date of Admission".to_string(),
            ],
            TallyError::Ingestion(IngestionError::Unreadable { .. }) => vec![
                "Verify the data file path".to_string(),
                "Check the file permissions".to_string(),
            ],
            TallyError::Config(_) => vec![
                "Compare the configuration file against the defaults".to_string(),
                "Remove the --config flag to run with built-in settings".to_string(),
            ],
            TallyError::Filter(FilterError::UnknownField { .. }) => vec![
                "Valid fields: gender, billing, chart, condition".to_string(),
            ],
            TallyError::Filter(_) => {
                vec!["Use the form field=value, e.g. gender=Female".to_string()]
            }
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            TallyError::Ingestion(IngestionError::MissingColumn { column }) => {
                format!("The dataset is missing the '{column}' column and cannot be loaded.")
            }
            TallyError::Ingestion(IngestionError::Unreadable { path, .. }) => {
                format!("Unable to read the dataset at '{path}'.")
            }
            _ => self.to_string(),
        }
    }
}
pub mod utils {
    use super::*;
    pub fn missing_column(column: &str) -> IngestionError {
        IngestionError::MissingColumn {
            column: column.to_string(),
        }
    }
    pub fn invalid_config(field: &str, value: impl ToString) -> ConfigError {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
    pub fn invalid_filter(field: &str, value: &str) -> FilterError {
        FilterError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
    pub fn error_severity(error: &TallyError) -> ErrorSeverity {
        match error {
            TallyError::Filter(_) => ErrorSeverity::Warning,
            TallyError::Ingestion(_) => ErrorSeverity::Critical,
            TallyError::Config(_) | TallyError::Serialisation(_) => ErrorSeverity::Error,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &TallyError) -> String {
        let severity = utils::error_severity(error);
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!(
            "[{}] {}: {}\n",
            severity.as_str(),
            error.category(),
            error.user_message()
        ));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
