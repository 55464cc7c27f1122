use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Local precondition failures. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("no dates selected")]
    #[diagnostic(code(gocab::validation::no_dates))]
    NoDatesSelected,

    #[error("no shift selected")]
    #[diagnostic(code(gocab::validation::no_shift))]
    NoShiftSelected,

    #[error("none of the selected dates has an available shift")]
    #[diagnostic(code(gocab::validation::no_matched_dates))]
    NoMatchedDates,

    #[error("shift {0} is not among the offered shifts")]
    #[diagnostic(code(gocab::validation::unknown_shift))]
    UnknownShift(String),

    #[error("a booking is already being submitted")]
    #[diagnostic(code(gocab::validation::submission_in_progress))]
    SubmissionInProgress,
}

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(gocab::validation))]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    #[diagnostic(code(gocab::network))]
    Network(String),

    #[error("Request timed out after {0:?}")]
    #[diagnostic(code(gocab::timeout))]
    Timeout(Duration),

    #[error("Service error: HTTP {status}{}", service_suffix(.message))]
    #[diagnostic(code(gocab::service))]
    Service { status: u16, message: Option<String> },

    #[error("Unexpected response: {0}")]
    #[diagnostic(code(gocab::decode))]
    Decode(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(gocab::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gocab::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(gocab::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(gocab::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gocab::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(gocab::other))]
    Other(String),
}

fn service_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" - {}", m),
        None => String::new(),
    }
}

impl Error {
    /// Text suitable for an alert shown to the employee.
    ///
    /// Validation failures get their own wording; a server-provided message
    /// wins over the generic failure text.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(v) => match v {
                ValidationError::NoDatesSelected => t!("alerts.no_dates").to_string(),
                ValidationError::NoShiftSelected => t!("alerts.no_shift").to_string(),
                ValidationError::NoMatchedDates => t!("alerts.no_matched_dates").to_string(),
                ValidationError::UnknownShift(_) => t!("alerts.unknown_shift").to_string(),
                ValidationError::SubmissionInProgress => {
                    t!("alerts.submission_in_progress").to_string()
                }
            },
            Error::Service {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Error::Timeout(_) => t!("alerts.timeout").to_string(),
            _ => t!("alerts.generic_failure").to_string(),
        }
    }

    /// Whether the error was raised locally without contacting the service
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BookingResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create network errors
pub fn network_error(message: &str) -> Error {
    Error::Network(message.to_string())
}
