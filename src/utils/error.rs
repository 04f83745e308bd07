use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Upstream fetch failed: {message}")]
    UpstreamFetch { message: String },

    #[error("Unsupported search category: {code}")]
    UnsupportedCategory { code: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Request,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdapterError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UpstreamFetch { .. } => ErrorCategory::Upstream,
            Self::UnsupportedCategory { .. } => ErrorCategory::Request,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UpstreamFetch { .. } => {
                "Check that the upstream directory is reachable and TAN_BASE_URL is correct"
            }
            Self::UnsupportedCategory { .. } => {
                "Send intent.category.descriptor.code = \"disability_services\""
            }
            Self::MissingConfigError { .. } => {
                "Provide the value via CLI flag, environment variable or TOML config"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration value and restart",
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) => "Make sure the input is valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UpstreamFetch { .. } => "Failed to fetch disability services".to_string(),
            Self::UnsupportedCategory { code } => {
                format!("Search category '{}' is not served by this adapter", code)
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
