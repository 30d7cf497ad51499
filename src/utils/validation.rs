use serde_json::Value;
use crate::core::library::{reason, LibraryError, LibraryResult};

pub const PATRON_ID_LEN: usize = 6;
pub const ISBN_LEN: usize = 13;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_patron_id(patron_id: &str) -> LibraryResult<()> {
    if !is_digits(patron_id, PATRON_ID_LEN) {
        return Err(LibraryError::validation("Invalid patron ID. Must be exactly 6 digits.",
                                            Some(reason::INVALID_PATRON.to_string())));
    }
    Ok(())
}

pub fn validate_isbn(isbn: &str) -> LibraryResult<()> {
    if !is_digits(isbn, ISBN_LEN) {
        return Err(LibraryError::validation("ISBN must be exactly 13 digits.",
                                            Some(reason::INVALID_BOOK.to_string())));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> LibraryResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LibraryError::validation("Title is required.", Some(reason::INVALID_BOOK.to_string())));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(LibraryError::validation("Title must be less than 200 characters.",
                                            Some(reason::INVALID_BOOK.to_string())));
    }
    Ok(())
}

pub fn validate_author(author: &str) -> LibraryResult<()> {
    let author = author.trim();
    if author.is_empty() {
        return Err(LibraryError::validation("Author is required.", Some(reason::INVALID_BOOK.to_string())));
    }
    if author.chars().count() > MAX_AUTHOR_LEN {
        return Err(LibraryError::validation("Author must be less than 100 characters.",
                                            Some(reason::INVALID_BOOK.to_string())));
    }
    Ok(())
}

pub fn validate_total_copies(total_copies: i64) -> LibraryResult<()> {
    if total_copies <= 0 {
        return Err(LibraryError::validation("Total copies must be a positive integer.",
                                            Some(reason::INVALID_BOOK.to_string())));
    }
    Ok(())
}

pub fn validate_transaction_id(transaction_id: &str) -> LibraryResult<()> {
    if transaction_id.is_empty() {
        return Err(invalid_transaction_id());
    }
    Ok(())
}

fn invalid_transaction_id() -> LibraryError {
    LibraryError::validation("Invalid transaction ID.", Some(reason::INVALID_TRANSACTION.to_string()))
}

fn invalid_refund_amount() -> LibraryError {
    LibraryError::validation("Invalid refund amount.", Some(reason::INVALID_AMOUNT.to_string()))
}

// transaction id of a request body: a missing, null or non-string value is invalid
pub fn parse_transaction_id(value: &Value) -> LibraryResult<&str> {
    let transaction_id = value.as_str().ok_or_else(invalid_transaction_id)?;
    validate_transaction_id(transaction_id)?;
    Ok(transaction_id)
}

// refund amount of a request body: a missing, null or non-numeric value is invalid
pub fn parse_refund_amount(value: &Value) -> LibraryResult<f64> {
    let amount = value.as_f64().ok_or_else(invalid_refund_amount)?;
    validate_refund_amount(amount)?;
    Ok(amount)
}

// NaN and infinities are rejected along with zero and negatives
pub fn validate_refund_amount(amount: f64) -> LibraryResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid_refund_amount());
    }
    Ok(())
}
