use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{reason, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::{matches_predicate, paginate, MemoryDatabase};

#[derive(Debug, Clone)]
pub struct MemoryBookRepository {
    database: MemoryDatabase,
}

impl MemoryBookRepository {
    pub fn new(database: MemoryDatabase) -> Self {
        Self { database }
    }

    fn sorted(mut books: Vec<BookEntity>) -> Vec<BookEntity> {
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.book_id.cmp(&b.book_id)));
        books
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        if tables.books.contains_key(&entity.book_id) {
            return Err(LibraryError::duplicate_key(format!("book {} already exists", entity.book_id).as_str()));
        }
        if tables.books.values().any(|b| b.isbn == entity.isbn) {
            return Err(LibraryError::duplicate_key("A book with this ISBN already exists."));
        }
        tables.books.insert(entity.book_id.to_string(), entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        match tables.books.get_mut(&entity.book_id) {
            Some(existing) if existing.version == entity.version => {
                *existing = entity.clone();
                existing.version = entity.version + 1;
                existing.updated_at = Utc::now().naive_utc();
                Ok(1)
            }
            Some(existing) => {
                Err(LibraryError::database(format!("stale book {} version {} != {}",
                                                   entity.book_id, entity.version, existing.version).as_str(), None, false))
            }
            None => {
                Err(LibraryError::not_found("Book not found.", Some(reason::BOOK_NOT_FOUND.to_string())))
            }
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let tables = self.database.lock()?;
        tables.books.get(id).cloned()
            .ok_or_else(|| LibraryError::not_found("Book not found.", Some(reason::BOOK_NOT_FOUND.to_string())))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut tables = self.database.lock()?;
        Ok(tables.books.remove(id).map(|_| 1).unwrap_or(0))
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let tables = self.database.lock()?;
        let matched = tables.books.values()
            .filter(|b| matches_predicate(*b, predicate))
            .cloned().collect();
        Ok(paginate(Self::sorted(matched), page, page_size))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let tables = self.database.lock()?;
        Ok(tables.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn list_all(&self) -> LibraryResult<Vec<BookEntity>> {
        let tables = self.database.lock()?;
        Ok(Self::sorted(tables.books.values().cloned().collect()))
    }
}
