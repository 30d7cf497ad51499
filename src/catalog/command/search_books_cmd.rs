use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::{CatalogService, SearchKind};
use crate::core::command::{Command, CommandError};

pub struct SearchBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl SearchBooksCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// query string of GET /catalog/search?q=..&type=..
#[derive(Debug, Deserialize)]
pub struct SearchBooksCommandRequest {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type", default = "default_search_type")]
    pub search_type: String,
}

fn default_search_type() -> String {
    SearchKind::Title.to_string()
}

impl SearchBooksCommandRequest {
    pub fn new(q: &str, search_type: &str) -> Self {
        Self {
            q: q.to_string(),
            search_type: search_type.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchBooksCommandResponse {
    pub books: Vec<BookDto>,
}

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        let kind = SearchKind::from(req.search_type.as_str());
        self.catalog_service.search_books(req.q.as_str(), kind)
            .await.map_err(CommandError::from).map(|books| SearchBooksCommandResponse { books })
    }
}
