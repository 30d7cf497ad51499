use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::fees::dto::FeeResult;
use crate::lending::dto::BorrowRecordDto;

// LoanDto is a borrow record joined with the book it refers to and its late fee.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanDto {
    #[serde(flatten)]
    pub record: BorrowRecordDto,
    pub title: String,
    pub author: String,
    pub fee: FeeResult,
}

impl LoanDto {
    pub fn new(record: BorrowRecordDto, book: &BookDto, fee: FeeResult) -> Self {
        Self {
            record,
            title: book.title.to_string(),
            author: book.author.to_string(),
            fee,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronStatusDto {
    pub patron_id: String,
    pub currently_borrowed: Vec<LoanDto>,
    pub borrow_count: usize,
    pub total_late_fees: f64,
    // every loan, oldest first
    pub borrow_history: Vec<LoanDto>,
}
