use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind}: {name}")]
    UnknownEntry { kind: EntryKind, name: String },

    #[error("Grade '{letter}' is not on the configured scale")]
    UnknownGrade { letter: String },
}

/// What a command referred to that the configuration does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Year,
    Term,
    Subject,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Year => write!(f, "year"),
            EntryKind::Term => write!(f, "term"),
            EntryKind::Subject => write!(f, "subject"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Configuration,
    Input,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl GpaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::IoError(_) | GpaError::SerializationError(_) => ErrorCategory::Storage,
            GpaError::CsvError(_) => ErrorCategory::Export,
            GpaError::ConfigValidationError { .. }
            | GpaError::MissingConfigError { .. }
            | GpaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GpaError::UnknownEntry { .. } | GpaError::UnknownGrade { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Export => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 依錯誤嚴重程度決定的 CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,   // 輸入錯誤，可修正後重試
            ErrorSeverity::High => 1,     // 配置或匯出錯誤
            ErrorSeverity::Critical => 3, // 存儲錯誤
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::IoError(e) => format!("Could not read or write grade data: {}", e),
            GpaError::SerializationError(_) => "Grade data could not be encoded".to_string(),
            GpaError::CsvError(e) => format!("Report export failed: {}", e),
            GpaError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            GpaError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            GpaError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            GpaError::UnknownEntry { kind, name } => {
                format!("There is no {} called '{}'", kind, name)
            }
            GpaError::UnknownGrade { letter } => {
                format!("'{}' is not a letter grade on this scale", letter)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GpaError::IoError(_) => "Check that the data directory exists and is writable",
            GpaError::SerializationError(_) => "Delete the stored grade file and select grades again",
            GpaError::CsvError(_) => "Check the output path and try the export again",
            GpaError::ConfigValidationError { .. }
            | GpaError::MissingConfigError { .. }
            | GpaError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or omit --config to use the demo dataset"
            }
            GpaError::UnknownEntry { kind: EntryKind::Year, .. } => {
                "Run `uninest-gpa years` to list the configured years"
            }
            GpaError::UnknownEntry { .. } => {
                "Run `uninest-gpa subjects` to list the terms and subjects of a year"
            }
            GpaError::UnknownGrade { .. } => "Run `uninest-gpa scale` to list valid letter grades",
        }
    }
}

pub type Result<T> = std::result::Result<T, GpaError>;
