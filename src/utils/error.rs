use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("Validation error in {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Step {step} is incomplete, missing: {}", missing.join(", "))]
    IncompleteStep {
        step: u8,
        missing: Vec<&'static str>,
    },

    #[error("Action '{action}' is not allowed on step {step}")]
    InvalidTransition { step: u8, action: &'static str },

    #[error("{message}")]
    PaymentError { message: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Flow,
    Payment,
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

impl BookingError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn payment(message: impl Into<String>) -> Self {
        Self::PaymentError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::NotFound { .. } => ErrorCategory::Input,
            Self::IncompleteStep { .. } | Self::InvalidTransition { .. } => ErrorCategory::Flow,
            Self::PaymentError { .. } => ErrorCategory::Payment,
            Self::ConfigError { .. } | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Flow => ErrorSeverity::Low,
            ErrorCategory::Payment => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::PaymentError { message } => message.clone(),
            Self::IncompleteStep { missing, .. } => {
                format!("Please complete the required fields: {}", missing.join(", "))
            }
            Self::ValidationError { field, reason } => format!("Invalid {}: {}", field, reason),
            Self::NotFound { kind, id } => format!("Unknown {}: {}", kind, id),
            Self::ConfigError { .. } | Self::TomlError(_) => {
                format!("Configuration problem: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the values you entered and try again",
            ErrorCategory::Flow => "Finish the current step before moving on",
            ErrorCategory::Payment => "Resubmit the payment or choose another payment method",
            ErrorCategory::Configuration => "Fix the configuration file and rerun",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
