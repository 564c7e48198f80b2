use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse {dataset} dataset at line {line}: {message}")]
    ParseError {
        dataset: String,
        line: u64,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Airline not found: {name}")]
    AirlineNotFound { name: String },

    #[error("Airline name '{name}' is ambiguous, matching ids {ids:?}")]
    AmbiguousAirline { name: String, ids: Vec<i64> },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Lookup,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_)
            | EtlError::HttpStatusError { .. }
            | EtlError::CsvError(_)
            | EtlError::ParseError { .. } => ErrorCategory::Fetch,
            EtlError::AirlineNotFound { .. } | EtlError::AmbiguousAirline { .. } => {
                ErrorCategory::Lookup
            }
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常可以重跑解決
            ErrorCategory::Fetch => match self {
                EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Lookup | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check your network connection and the dataset URLs, then run again".to_string()
            }
            EtlError::HttpStatusError { url, .. } => {
                format!("Verify that {} is reachable and serves the dataset", url)
            }
            EtlError::CsvError(_) | EtlError::ParseError { .. } => {
                "The dataset does not follow the OpenFlights column layout; check the URL or clear the cache directory".to_string()
            }
            EtlError::AirlineNotFound { .. } => {
                "Check the airline spelling against airlines.dat, or pass --airline-id".to_string()
            }
            EtlError::AmbiguousAirline { ids, .. } => {
                format!("Pass --airline-id with one of {:?}", ids)
            }
            EtlError::IoError(_) => "Check that the output path is writable".to_string(),
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Fetch => format!("Could not retrieve the flight datasets: {}", self),
            ErrorCategory::Lookup => format!("Could not select the airline: {}", self),
            ErrorCategory::Storage => format!("Could not write the output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
