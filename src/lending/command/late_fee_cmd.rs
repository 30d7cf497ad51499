use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fees::dto::FeeResult;
use crate::lending::domain::LendingService;

pub struct LateFeeCommand {
    lending_service: Box<dyn LendingService>,
}

impl LateFeeCommand {
    pub fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LateFeeCommandRequest {
    pub patron_id: String,
    pub book_id: String,
}

impl LateFeeCommandRequest {
    pub fn new(patron_id: &str, book_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LateFeeCommandResponse {
    pub patron_id: String,
    pub book_id: String,
    pub fee: FeeResult,
}

#[async_trait]
impl Command<LateFeeCommandRequest, LateFeeCommandResponse> for LateFeeCommand {
    async fn execute(&self, req: LateFeeCommandRequest) -> Result<LateFeeCommandResponse, CommandError> {
        let fee = self.lending_service.late_fee(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from)?;
        Ok(LateFeeCommandResponse { patron_id: req.patron_id, book_id: req.book_id, fee })
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::fees::dto::FeeStatus;
    use crate::lending::command::late_fee_cmd::{LateFeeCommand, LateFeeCommandRequest};
    use crate::lending::factory;

    lazy_static! {
        static ref SUT_CMD : AsyncOnce<LateFeeCommand> = AsyncOnce::new(async {
                let svc = factory::create_lending_service(&Configuration::new("test"), RepositoryStore::InMemory)
                    .await.expect("should create lending service");
                LateFeeCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_late_fee() {
        let cmd = SUT_CMD.get().await;
        let res = cmd.execute(LateFeeCommandRequest::new("200021", "never-borrowed"))
            .await.expect("should compute fee");
        assert_eq!(FeeStatus::NoRecord, res.fee.status);
        assert_eq!(0.0, res.fee.fee_amount);

        let err = cmd.execute(LateFeeCommandRequest::new("2000", "never-borrowed"))
            .await.expect_err("invalid patron");
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
