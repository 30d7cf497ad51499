use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct ListBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl ListBooksCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
}

#[async_trait]
impl Command<(), ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, _req: ()) -> Result<ListBooksCommandResponse, CommandError> {
        self.catalog_service.list_books()
            .await.map_err(CommandError::from).map(|books| ListBooksCommandResponse { books })
    }
}

#[cfg(test)]
mod tests {
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::command::list_books_cmd::ListBooksCommand;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::utils::memory::MemoryDatabase;

    #[tokio::test]
    async fn test_should_run_list_books() {
        let db = MemoryDatabase::new();
        let config = Configuration::new("test");
        let catalog = CatalogServiceImpl::new(&config, Box::new(MemoryBookRepository::new(db.clone())));
        catalog.add_book("Wuthering Heights", "Emily Bronte", "9780141439556", 1).await.expect("should add book");
        catalog.add_book("Jane Eyre", "Charlotte Bronte", "9780141441146", 1).await.expect("should add book");

        let cmd = ListBooksCommand::new(Box::new(catalog));
        let res = cmd.execute(()).await.expect("should list books");
        assert_eq!(vec!["Jane Eyre".to_string(), "Wuthering Heights".to_string()],
                   res.books.into_iter().map(|b| b.title).collect::<Vec<String>>());
    }
}
