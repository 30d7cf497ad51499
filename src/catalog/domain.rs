pub mod service;

use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, title: &str, author: &str, isbn: &str, total_copies: i64) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto>;
    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookDto>>;
    async fn list_books(&self) -> LibraryResult<Vec<BookDto>>;
    async fn search_books(&self, term: &str, kind: SearchKind) -> LibraryResult<Vec<BookDto>>;
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum SearchKind {
    Title,
    Author,
    Isbn,
    // anything else matches nothing
    Unsupported,
}

impl From<&str> for SearchKind {
    fn from(s: &str) -> Self {
        match s {
            "title" => SearchKind::Title,
            "author" => SearchKind::Author,
            "isbn" => SearchKind::Isbn,
            _ => SearchKind::Unsupported,
        }
    }
}

impl Display for SearchKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SearchKind::Title => write!(f, "title"),
            SearchKind::Author => write!(f, "author"),
            SearchKind::Isbn => write!(f, "isbn"),
            SearchKind::Unsupported => write!(f, "unsupported"),
        }
    }
}
