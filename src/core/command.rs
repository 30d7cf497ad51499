use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
        reason_code: Option<String>,
    },
    Policy {
        message: String,
        reason_code: Option<String>,
    },
    PaymentDeclined {
        message: String,
    },
    PaymentProcessing {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message, reason_code } => {
                CommandError::NotFound { message, reason_code }
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::PolicyViolation { message, reason_code } => {
                CommandError::Policy { message, reason_code }
            }
            LibraryError::PaymentDeclined { message } => {
                CommandError::PaymentDeclined { message }
            }
            LibraryError::PaymentProcessing { message } => {
                CommandError::PaymentProcessing { message }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: true }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::CommandError;
    use crate::core::library::{reason, LibraryError};

    #[tokio::test]
    async fn test_should_convert_library_error() {
        let err = CommandError::from(LibraryError::policy("limit", Some(reason::LIMIT_EXCEEDED.to_string())));
        assert_eq!(CommandError::Policy { message: "limit".to_string(), reason_code: Some(reason::LIMIT_EXCEEDED.to_string()) }, err);

        let err = CommandError::from(LibraryError::payment_processing("down"));
        assert_eq!(CommandError::PaymentProcessing { message: "down".to_string() }, err);

        let err = CommandError::from(LibraryError::unavailable("throttled", None, true));
        assert!(matches!(err, CommandError::Runtime { retryable: true, .. }));
    }
}
