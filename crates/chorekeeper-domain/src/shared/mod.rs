use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(TaskId);
define_id!(CategoryId);
define_id!(CompletionId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Entitlement (1xxx)
    InsufficientBalance = 1001,
    InvalidPurchase = 1002,

    // Resource Not Found (2xxx)
    LedgerNotFound = 2001,
    AchievementNotFound = 2002,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    DataIntegrityError = 4002,
    SerializationError = 4003,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidInput = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::InsufficientBalance
            | ErrorCode::InvalidPurchase
            | ErrorCode::ValidationError
            | ErrorCode::InvalidInput
            | ErrorCode::LedgerNotFound
            | ErrorCode::AchievementNotFound => ErrorSeverity::Info,

            ErrorCode::DataIntegrityError | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            _ => ErrorSeverity::Warning,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::InsufficientBalance
                | ErrorCode::InvalidPurchase
                | ErrorCode::ValidationError
                | ErrorCode::InvalidInput
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InsufficientBalance(_) => ErrorCode::InsufficientBalance,
            DomainError::InvalidInput(_) => ErrorCode::InvalidInput,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::NotFound(_) => ErrorCode::LedgerNotFound,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Serialization(_) => ErrorCode::SerializationError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::InsufficientBalance(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::Validation(msg)
            | DomainError::NotFound(msg)
            | DomainError::Repository(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Serialization(msg)
            | DomainError::DataIntegrity(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
