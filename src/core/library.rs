use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

// Reason codes attached to LibraryError so callers can tell apart failures that share a variant.
pub mod reason {
    pub const INVALID_PATRON: &str = "InvalidPatron";
    pub const INVALID_BOOK: &str = "InvalidBook";
    pub const INVALID_TRANSACTION: &str = "InvalidTransaction";
    pub const INVALID_AMOUNT: &str = "InvalidAmount";
    pub const BOOK_NOT_FOUND: &str = "BookNotFound";
    pub const NO_ACTIVE_RECORD: &str = "NoActiveRecord";
    pub const LIMIT_EXCEEDED: &str = "LimitExceeded";
    pub const UNAVAILABLE: &str = "Unavailable";
    pub const NO_OUTSTANDING_FEE: &str = "NoOutstandingFee";
    pub const DUPLICATE_ISBN: &str = "DuplicateIsbn";
}

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
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
    // This is a retry-able error, which indicates that the store could not serve the request
    // right now (throttled or timed out). The caller can retry with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    // A well-formed request that the lending policy refuses, e.g. borrow limit reached.
    PolicyViolation {
        message: String,
        reason_code: Option<String>,
    },
    // The payment gateway answered and declined the charge or refund.
    PaymentDeclined {
        message: String,
    },
    // The payment gateway could not be reached or blew up while processing.
    PaymentProcessing {
        message: String,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::NotFound { message: message.to_string(), reason_code }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn policy(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::PolicyViolation { message: message.to_string(), reason_code }
    }

    pub fn payment_declined(message: &str) -> LibraryError {
        LibraryError::PaymentDeclined { message: message.to_string() }
    }

    pub fn payment_processing(message: &str) -> LibraryError {
        LibraryError::PaymentProcessing { message: message.to_string() }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    // the user-facing message without the debugging suffixes added by Display
    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. } => { message }
            LibraryError::DuplicateKey { message } => { message }
            LibraryError::NotFound { message, .. } => { message }
            LibraryError::CurrentlyUnavailable { message, .. } => { message }
            LibraryError::Validation { message, .. } => { message }
            LibraryError::PolicyViolation { message, .. } => { message }
            LibraryError::PaymentDeclined { message } => { message }
            LibraryError::PaymentProcessing { message } => { message }
            LibraryError::Serialization { message } => { message }
            LibraryError::Runtime { message, .. } => { message }
        }
    }

    pub fn reason_code(&self) -> Option<&str> {
        match self {
            LibraryError::Database { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::NotFound { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::CurrentlyUnavailable { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Validation { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::PolicyViolation { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Runtime { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::DuplicateKey { .. } => { Some(reason::DUPLICATE_ISBN) }
            LibraryError::PaymentDeclined { .. } => { None }
            LibraryError::PaymentProcessing { .. } => { None }
            LibraryError::Serialization { .. } => { None }
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::PolicyViolation { .. } => { false }
            LibraryError::PaymentDeclined { .. } => { false }
            LibraryError::PaymentProcessing { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message, .. } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, .. } => {
                write!(f, "{}", message)
            }
            LibraryError::PolicyViolation { message, .. } => {
                write!(f, "{}", message)
            }
            LibraryError::PaymentDeclined { message } => {
                write!(f, "{}", message)
            }
            LibraryError::PaymentProcessing { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for library services and repositories.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub fn new(page: Option<&str>, page_size: usize,
               next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl From<String> for BorrowStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Borrowed" => BorrowStatus::Borrowed,
            "Returned" => BorrowStatus::Returned,
            _ => BorrowStatus::Borrowed,
        }
    }
}

impl Display for BorrowStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BorrowStatus::Borrowed => write!(f, "Borrowed"),
            BorrowStatus::Returned => write!(f, "Returned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{reason, BorrowStatus, LibraryError};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        let err = LibraryError::duplicate_key("test");
        assert!(matches!(err, LibraryError::DuplicateKey{ message: _ }));
        assert_eq!(Some(reason::DUPLICATE_ISBN), err.reason_code());
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        let err = LibraryError::not_found("Book not found.", Some(reason::BOOK_NOT_FOUND.to_string()));
        assert!(matches!(err, LibraryError::NotFound{ message: _, reason_code: _ }));
        assert_eq!(Some(reason::BOOK_NOT_FOUND), err.reason_code());
        assert_eq!("Book not found.", err.message());
    }

    #[tokio::test]
    async fn test_should_create_unavailable_error() {
        assert!(matches!(LibraryError::unavailable("test", None, false), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_policy_error() {
        let err = LibraryError::policy("limit", Some(reason::LIMIT_EXCEEDED.to_string()));
        assert!(matches!(err, LibraryError::PolicyViolation{ message: _, reason_code: _ }));
        assert_eq!(Some(reason::LIMIT_EXCEEDED), err.reason_code());
    }

    #[tokio::test]
    async fn test_should_create_payment_errors() {
        assert!(matches!(LibraryError::payment_declined("Payment failed: Declined"), LibraryError::PaymentDeclined{ message: _ }));
        let err = LibraryError::payment_processing("Payment processing error: down");
        assert_eq!("Payment processing error: down", err.to_string());
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(LibraryError::serialization("test"), LibraryError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(LibraryError::runtime("test", None), LibraryError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _, reason_code: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert!(!LibraryError::database("test", None, false).retryable());
        assert!(!LibraryError::duplicate_key("test").retryable());
        assert!(!LibraryError::not_found("test", None).retryable());
        assert!(!LibraryError::unavailable("test", None, false).retryable());
        assert!(LibraryError::unavailable("test", None, true).retryable());
        assert!(!LibraryError::validation("test", None).retryable());
        assert!(!LibraryError::policy("test", None).retryable());
        assert!(!LibraryError::payment_declined("test").retryable());
        assert!(!LibraryError::payment_processing("test").retryable());
        assert!(!LibraryError::serialization("test").retryable());
        assert!(!LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_borrow_status() {
        for status in vec![BorrowStatus::Borrowed, BorrowStatus::Returned] {
            let str = status.to_string();
            assert_eq!(status, BorrowStatus::from(str));
        }
    }
}
