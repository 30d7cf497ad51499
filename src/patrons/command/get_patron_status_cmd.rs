use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronStatusDto;

pub struct GetPatronStatusCommand {
    patron_service: Box<dyn PatronService>,
}

impl GetPatronStatusCommand {
    pub fn new(patron_service: Box<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetPatronStatusCommandRequest {
    pub patron_id: String,
}

impl GetPatronStatusCommandRequest {
    pub fn new(patron_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetPatronStatusCommandResponse {
    pub status: PatronStatusDto,
}

impl GetPatronStatusCommandResponse {
    pub fn new(status: PatronStatusDto) -> Self {
        Self {
            status,
        }
    }
}

#[async_trait]
impl Command<GetPatronStatusCommandRequest, GetPatronStatusCommandResponse> for GetPatronStatusCommand {
    async fn execute(&self, req: GetPatronStatusCommandRequest) -> Result<GetPatronStatusCommandResponse, CommandError> {
        self.patron_service.status_report(req.patron_id.as_str())
            .await.map_err(CommandError::from).map(GetPatronStatusCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::catalog::factory::create_catalog_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::lending::factory::create_lending_service;
    use crate::patrons::command::get_patron_status_cmd::{GetPatronStatusCommand, GetPatronStatusCommandRequest};
    use crate::patrons::factory;

    lazy_static! {
        static ref SUT_CMD : AsyncOnce<GetPatronStatusCommand> = AsyncOnce::new(async {
                let svc = factory::create_patron_service(&Configuration::new("test"), RepositoryStore::InMemory)
                    .await.expect("should create patron service");
                GetPatronStatusCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_get_patron_status() {
        let cmd = SUT_CMD.get().await;
        let config = Configuration::new("test");
        let catalog = create_catalog_service(&config, RepositoryStore::InMemory).await.expect("catalog");
        let lending = create_lending_service(&config, RepositoryStore::InMemory).await.expect("lending");
        let book = catalog.add_book("Walden", "Henry David Thoreau", "9780691096124", 1).await.expect("should add book");
        lending.borrow("200041", book.book_id.as_str()).await.expect("should borrow");

        let res = cmd.execute(GetPatronStatusCommandRequest::new("200041")).await.expect("should report");
        assert_eq!(1, res.status.borrow_count);
        assert_eq!("Walden", res.status.currently_borrowed[0].title.as_str());
        assert_eq!(0.0, res.status.total_late_fees);

        let err = cmd.execute(GetPatronStatusCommandRequest::new("")).await.expect_err("invalid patron");
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
