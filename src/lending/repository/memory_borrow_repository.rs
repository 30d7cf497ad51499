use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use crate::books::domain::model::BookEntity;
use crate::core::library::{reason, BorrowStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::repository::{sort_by_borrowed_at, BorrowRepository, LendingWrite};
use crate::utils::memory::{matches_predicate, paginate, MemoryDatabase};

#[derive(Debug, Clone)]
pub struct MemoryBorrowRepository {
    database: MemoryDatabase,
}

impl MemoryBorrowRepository {
    pub fn new(database: MemoryDatabase) -> Self {
        Self { database }
    }

    fn records_of(&self, patron_id: &str, open_only: bool) -> LibraryResult<Vec<BorrowRecordEntity>> {
        let tables = self.database.lock()?;
        let mut records: Vec<BorrowRecordEntity> = tables.borrow_records.iter()
            .filter(|r| r.patron_id == patron_id && (!open_only || r.is_open()))
            .cloned().collect();
        sort_by_borrowed_at(&mut records);
        Ok(records)
    }

    fn latest_of(&self, patron_id: &str, book_id: &str, open_only: bool) -> LibraryResult<Option<BorrowRecordEntity>> {
        let tables = self.database.lock()?;
        Ok(tables.borrow_records.iter().rev()
            .find(|r| r.patron_id == patron_id && r.book_id == book_id && (!open_only || r.is_open()))
            .cloned())
    }
}

fn apply_write(books: &mut HashMap<String, BookEntity>, records: &mut Vec<BorrowRecordEntity>,
               write: &LendingWrite) -> LibraryResult<()> {
    match write {
        LendingWrite::InsertRecord(record) => {
            if records.iter().any(|r| r.borrow_id == record.borrow_id) {
                return Err(LibraryError::duplicate_key(
                    format!("borrow record {} already exists", record.borrow_id).as_str()));
            }
            records.push(record.clone());
        }
        LendingWrite::CloseRecord { borrow_id, version, returned_at } => {
            let record = records.iter_mut().find(|r| &r.borrow_id == borrow_id)
                .ok_or_else(|| LibraryError::not_found(
                    "No active borrow record found for this patron and book.",
                    Some(reason::NO_ACTIVE_RECORD.to_string())))?;
            if !record.is_open() || record.version != *version {
                return Err(LibraryError::database(
                    format!("borrow record {} was modified concurrently", borrow_id).as_str(),
                    Some("ConditionalCheckFailed".to_string()), false));
            }
            record.returned_at = Some(*returned_at);
            record.borrow_status = BorrowStatus::Returned;
            record.version += 1;
            record.updated_at = *returned_at;
        }
        LendingWrite::AdjustCopies { book_id, delta } => {
            let book = books.get_mut(book_id)
                .ok_or_else(|| LibraryError::not_found("Book not found.", Some(reason::BOOK_NOT_FOUND.to_string())))?;
            let available = book.available_copies + delta;
            if available < 0 || available > book.total_copies {
                return Err(LibraryError::database(
                    format!("available copies of {} would become {} of {}",
                            book_id, available, book.total_copies).as_str(),
                    Some("ConditionalCheckFailed".to_string()), false));
            }
            book.available_copies = available;
            book.version += 1;
            book.updated_at = Utc::now().naive_utc();
        }
    }
    Ok(())
}

#[async_trait]
impl Repository<BorrowRecordEntity> for MemoryBorrowRepository {
    async fn create(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        self.transact(&[LendingWrite::InsertRecord(entity.clone())]).await
    }

    async fn update(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        match tables.borrow_records.iter_mut().find(|r| r.borrow_id == entity.borrow_id) {
            Some(existing) if existing.version == entity.version => {
                *existing = entity.clone();
                existing.version = entity.version + 1;
                existing.updated_at = Utc::now().naive_utc();
                Ok(1)
            }
            Some(existing) => {
                Err(LibraryError::database(format!("stale borrow record {} version {} != {}",
                                                   entity.borrow_id, entity.version, existing.version).as_str(), None, false))
            }
            None => {
                Err(LibraryError::not_found(format!("borrow record not found for {}", entity.borrow_id).as_str(), None))
            }
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowRecordEntity> {
        let tables = self.database.lock()?;
        tables.borrow_records.iter().find(|r| r.borrow_id == id).cloned()
            .ok_or_else(|| LibraryError::not_found(format!("borrow record not found for {}", id).as_str(), None))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        let before = tables.borrow_records.len();
        tables.borrow_records.retain(|r| r.borrow_id != id);
        Ok(before - tables.borrow_records.len())
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowRecordEntity>> {
        let tables = self.database.lock()?;
        let matched = tables.borrow_records.iter()
            .filter(|r| matches_predicate(*r, predicate))
            .cloned().collect();
        Ok(paginate(matched, page, page_size))
    }
}

#[async_trait]
impl BorrowRepository for MemoryBorrowRepository {
    async fn find_latest(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>> {
        self.latest_of(patron_id, book_id, false)
    }

    async fn find_open(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>> {
        self.latest_of(patron_id, book_id, true)
    }

    async fn find_open_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.records_of(patron_id, true)
    }

    async fn count_open(&self, patron_id: &str) -> LibraryResult<usize> {
        let tables = self.database.lock()?;
        Ok(tables.borrow_records.iter().filter(|r| r.patron_id == patron_id && r.is_open()).count())
    }

    async fn find_history(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.records_of(patron_id, false)
    }

    // every write is applied to a copy of the tables, which replaces them only when all succeed
    async fn transact(&self, writes: &[LendingWrite]) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        let mut books = tables.books.clone();
        let mut records = tables.borrow_records.clone();
        for write in writes {
            if let Err(err) = apply_write(&mut books, &mut records, write) {
                warn!(error = %err, writes = writes.len(), "rejected lending write batch");
                return Err(err);
            }
        }
        tables.books = books;
        tables.borrow_records = records;
        Ok(writes.len())
    }
}
