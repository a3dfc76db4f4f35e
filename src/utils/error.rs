use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{field} not set in environment or .env")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{service} returned status {status}")]
    HttpStatusError { service: String, status: u16 },

    #[error("Empty response from {service}")]
    EmptyResponseError { service: String },

    #[error("{service} API error{}: {message}", .code.map(|c| format!(" {}", c)).unwrap_or_default())]
    UpstreamError {
        service: String,
        code: Option<i64>,
        message: String,
        /// Rate limits and backend hiccups reported in-band.
        transient: bool,
    },

    #[error("{service} request failed after {attempts} attempts: {last_error}")]
    RetriesExhaustedError {
        service: String,
        attempts: u32,
        last_error: String,
    },

    #[error("No members found for faction {faction_id}")]
    NoMembersError { faction_id: String },

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::MissingConfigError { .. } | ScoutError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            ScoutError::ApiError(_)
            | ScoutError::HttpStatusError { .. }
            | ScoutError::EmptyResponseError { .. }
            | ScoutError::RetriesExhaustedError { .. } => ErrorCategory::Network,
            ScoutError::UpstreamError { .. } => ErrorCategory::Upstream,
            ScoutError::NoMembersError { .. } => ErrorCategory::Data,
            ScoutError::IoError(_) | ScoutError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Network => {
                if self.is_retryable() {
                    ErrorSeverity::Medium
                } else {
                    ErrorSeverity::High
                }
            }
            ErrorCategory::Upstream | ErrorCategory::Data | ErrorCategory::Output => {
                ErrorSeverity::High
            }
        }
    }

    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScoutError::ApiError(e) => !e.is_builder(),
            ScoutError::EmptyResponseError { .. } => true,
            ScoutError::HttpStatusError { status, .. } => *status == 429 || *status >= 500,
            ScoutError::UpstreamError { transient, .. } => *transient,
            _ => false,
        }
    }

    /// Process exit code for a run that ends with this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoutError::MissingConfigError { .. } => {
                "Set TORN_API_KEY, FFSCOUTER_API_KEY and FACTION_ID in the environment or a .env file"
            }
            ScoutError::InvalidConfigValueError { .. } => {
                "Check the command-line flags and environment values"
            }
            ScoutError::ApiError(_) | ScoutError::RetriesExhaustedError { .. } => {
                "Check network connectivity and try again later"
            }
            ScoutError::HttpStatusError { status, .. } if *status == 429 => {
                "Rate limited; wait a minute or use a smaller --batch"
            }
            ScoutError::HttpStatusError { .. } | ScoutError::EmptyResponseError { .. } => {
                "The API may be down; try again later"
            }
            ScoutError::UpstreamError {
                transient: true, ..
            } => "The API is rate limiting or temporarily unavailable; try again later",
            ScoutError::UpstreamError { .. } => "Verify the API key and its access level",
            ScoutError::NoMembersError { .. } => "Verify FACTION_ID refers to an existing faction",
            ScoutError::IoError(_) => "Check that the output path is writable",
            ScoutError::SerializationError(_) => {
                "Re-run with --verbose and inspect the logged response"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("{}. Aborting.", self),
            ErrorCategory::Network | ErrorCategory::Upstream => {
                format!("Failed to fetch data: {}", self)
            }
            ErrorCategory::Data => self.to_string(),
            ErrorCategory::Output => format!("Failed to write output file: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_two() {
        let err = ScoutError::MissingConfigError {
            field: "FACTION_ID".to_string(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "FACTION_ID not set in environment or .env");
    }

    #[test]
    fn test_fetch_errors_exit_with_one() {
        let err = ScoutError::RetriesExhaustedError {
            service: "Torn".to_string(),
            attempts: 3,
            last_error: "boom".to_string(),
        };
        assert_eq!(err.exit_code(), 1);

        let err = ScoutError::NoMembersError {
            faction_id: "42".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_retryable_statuses() {
        let status = |status| ScoutError::HttpStatusError {
            service: "FFScouter".to_string(),
            status,
        };
        assert!(status(429).is_retryable());
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(404).is_retryable());

        let upstream = ScoutError::UpstreamError {
            service: "Torn".to_string(),
            code: Some(2),
            message: "Incorrect key".to_string(),
            transient: false,
        };
        assert!(!upstream.is_retryable());
        assert_eq!(upstream.to_string(), "Torn API error 2: Incorrect key");

        let rate_limited = ScoutError::UpstreamError {
            service: "Torn".to_string(),
            code: Some(5),
            message: "Too many requests".to_string(),
            transient: true,
        };
        assert!(rate_limited.is_retryable());
        assert_eq!(rate_limited.severity(), ErrorSeverity::High);
    }
}
