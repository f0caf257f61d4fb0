use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Source '{source_name}' is malformed: {message}")]
    SourceFormatError { source_name: String, message: String },
}

impl EtlError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EtlError::ConfigError { .. }
                | EtlError::MissingConfigError { .. }
                | EtlError::InvalidConfigValueError { .. }
        )
    }

    /// 給 CLI 使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => "The request timed out".to_string(),
            EtlError::ApiError(e) if e.is_connect() => "Could not connect to the server".to_string(),
            EtlError::ApiError(e) => match e.status() {
                Some(status) => format!("The server answered with HTTP {}", status.as_u16()),
                None => "The HTTP request failed".to_string(),
            },
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "A source file could not be found".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check the source URL and your network connection",
            EtlError::CsvError(_) => "Make sure the source is a CSV export with a header row",
            EtlError::IoError(_) => "Check that the file path exists and is readable",
            EtlError::SerializationError(_) => "Make sure the JSON file holds an array of objects",
            EtlError::SpreadsheetError(_) => "Make sure the workbook is a valid .xlsx, .xls or .ods file",
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run the import again"
            }
            EtlError::SourceFormatError { .. } => "Check the layout of the source data",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
