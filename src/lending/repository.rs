pub mod ddb_borrow_repository;
pub mod memory_borrow_repository;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;

// LendingWrite is one mutation of a lending write batch. A batch is applied entirely or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum LendingWrite {
    // insert a new open borrow record
    InsertRecord(BorrowRecordEntity),
    // mark an open record returned, guarded by its version
    CloseRecord {
        borrow_id: String,
        version: i64,
        returned_at: NaiveDateTime,
    },
    // change available copies of a book, never below zero or above total copies
    AdjustCopies {
        book_id: String,
        delta: i64,
    },
}

#[async_trait]
pub trait BorrowRepository: Repository<BorrowRecordEntity> {
    // most recently created record for the pair, open or not
    async fn find_latest(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>>;

    // most recently created open record for the pair
    async fn find_open(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>>;

    // open records of a patron ordered by borrowed_at
    async fn find_open_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>>;

    async fn count_open(&self, patron_id: &str) -> LibraryResult<usize>;

    // all records of a patron ordered by borrowed_at
    async fn find_history(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>>;

    async fn transact(&self, writes: &[LendingWrite]) -> LibraryResult<usize>;
}

// oldest first; the sort is stable so records borrowed at the same instant keep store order
pub(crate) fn sort_by_borrowed_at(records: &mut [BorrowRecordEntity]) {
    records.sort_by(|a, b| a.borrowed_at.cmp(&b.borrowed_at)
        .then_with(|| a.created_at.cmp(&b.created_at)));
}
