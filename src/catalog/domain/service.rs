use async_trait::async_trait;
use tracing::info;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::{CatalogService, SearchKind};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::validation::{validate_author, validate_isbn, validate_title, validate_total_copies};

pub struct CatalogServiceImpl {
    branch_id: String,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, title: &str, author: &str, isbn: &str, total_copies: i64) -> LibraryResult<BookDto> {
        validate_title(title)?;
        validate_author(author)?;
        validate_isbn(isbn)?;
        validate_total_copies(total_copies)?;
        if self.book_repository.find_by_isbn(isbn).await?.is_some() {
            return Err(LibraryError::duplicate_key("A book with this ISBN already exists."));
        }
        let book = BookDto::new(title, author, isbn, total_copies);
        self.book_repository.create(&BookEntity::from(&book)).await?;
        info!(branch = %self.branch_id, book_id = %book.book_id, isbn = %book.isbn, "book added to catalog");
        Ok(book)
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookDto>> {
        let res = self.book_repository.find_by_isbn(isbn).await?;
        Ok(res.as_ref().map(BookDto::from))
    }

    async fn list_books(&self) -> LibraryResult<Vec<BookDto>> {
        let res = self.book_repository.list_all().await?;
        Ok(res.iter().map(BookDto::from).collect())
    }

    async fn search_books(&self, term: &str, kind: SearchKind) -> LibraryResult<Vec<BookDto>> {
        if kind == SearchKind::Unsupported {
            return Ok(vec![]);
        }
        let needle = term.trim().to_lowercase();
        let books = self.list_books().await?;
        Ok(books.into_iter().filter(|b| match kind {
            SearchKind::Title => b.title.to_lowercase().contains(&needle),
            SearchKind::Author => b.author.to_lowercase().contains(&needle),
            SearchKind::Isbn => b.isbn == term,
            SearchKind::Unsupported => false,
        }).collect())
    }
}
