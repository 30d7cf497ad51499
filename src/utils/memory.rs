use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value;
use crate::books::domain::model::BookEntity;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::lending::domain::model::BorrowRecordEntity;

lazy_static! {
    static ref SHARED_DATABASE: MemoryDatabase = MemoryDatabase::new();
}

// Tables of the in-memory store. Books and borrow records sit behind the same lock
// so that a lending write batch can check and apply all of its writes at once.
// Borrow records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryTables {
    pub books: HashMap<String, BookEntity>,
    pub borrow_records: Vec<BorrowRecordEntity>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // process-wide instance backing RepositoryStore::InMemory
    pub fn shared() -> Self {
        SHARED_DATABASE.clone()
    }

    pub(crate) fn lock(&self) -> LibraryResult<MutexGuard<'_, MemoryTables>> {
        self.tables.lock().map_err(|err| {
            LibraryError::database(format!("memory store lock poisoned {}", err).as_str(), None, false)
        })
    }
}

// equality match of every predicate entry against the serialized entity
pub(crate) fn matches_predicate<T: Serialize>(entity: &T, predicate: &HashMap<String, String>) -> bool {
    if predicate.is_empty() {
        return true;
    }
    let value = match serde_json::to_value(entity) {
        Ok(value) => value,
        Err(_) => return false,
    };
    predicate.iter().all(|(k, v)| {
        match value.get(k) {
            Some(Value::String(s)) => s == v,
            Some(Value::Number(n)) => n.to_string() == *v,
            Some(Value::Bool(b)) => b.to_string() == *v,
            Some(Value::Null) | None => v.is_empty(),
            _ => false,
        }
    })
}

// the page token of the in-memory store is the offset of the next record
pub(crate) fn paginate<T>(records: Vec<T>, page: Option<&str>, page_size: usize) -> PaginatedResult<T> {
    let offset = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
    let total = records.len();
    let records: Vec<T> = records.into_iter().skip(offset).take(page_size).collect();
    let next_page = if offset + records.len() < total {
        Some((offset + records.len()).to_string())
    } else {
        None
    };
    PaginatedResult::new(page, page_size, next_page, records)
}
