use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::fees::dto::FeeResult;
use crate::lending::dto::{BorrowReceipt, ReturnReceipt};

pub mod model;
pub mod service;

#[async_trait]
pub trait LendingService: Sync + Send {
    async fn borrow(&self, patron_id: &str, book_id: &str) -> LibraryResult<BorrowReceipt>;
    async fn return_book(&self, patron_id: &str, book_id: &str) -> LibraryResult<ReturnReceipt>;
    // fee of the latest borrow record of the patron for the book
    async fn late_fee(&self, patron_id: &str, book_id: &str) -> LibraryResult<FeeResult>;
}
