use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::payments::domain::PaymentService;
use crate::payments::dto::PaymentReceipt;

pub struct PayLateFeeCommand {
    payment_service: Box<dyn PaymentService>,
}

impl PayLateFeeCommand {
    pub fn new(payment_service: Box<dyn PaymentService>) -> Self {
        Self {
            payment_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PayLateFeeCommandRequest {
    pub patron_id: String,
    pub book_id: String,
}

impl PayLateFeeCommandRequest {
    pub fn new(patron_id: &str, book_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayLateFeeCommandResponse {
    pub receipt: PaymentReceipt,
}

impl PayLateFeeCommandResponse {
    pub fn new(receipt: PaymentReceipt) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<PayLateFeeCommandRequest, PayLateFeeCommandResponse> for PayLateFeeCommand {
    async fn execute(&self, req: PayLateFeeCommandRequest) -> Result<PayLateFeeCommandResponse, CommandError> {
        self.payment_service.pay_late_fees(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(PayLateFeeCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::gateway::adapters::stub::StubPaymentGateway;
    use crate::gateway::payment::PaymentOutcome;
    use crate::lending::factory::create_lending_service;
    use crate::payments::command::pay_late_fee_cmd::{PayLateFeeCommand, PayLateFeeCommandRequest};
    use crate::payments::domain::service::PaymentServiceImpl;

    #[tokio::test]
    async fn test_should_run_pay_late_fee() {
        let lending = create_lending_service(&Configuration::new("test"), RepositoryStore::InMemory)
            .await.expect("should create lending service");
        let gateway = Arc::new(StubPaymentGateway::replying(Ok(PaymentOutcome::charged("TXN1234567"))));
        let cmd = PayLateFeeCommand::new(Box::new(PaymentServiceImpl::new(lending, gateway.clone())));

        let err = cmd.execute(PayLateFeeCommandRequest::new("200031", "never-borrowed"))
            .await.expect_err("no fee to pay");
        assert_eq!(CommandError::Policy {
            message: "No outstanding late fee for this book.".to_string(),
            reason_code: Some("NoOutstandingFee".to_string()),
        }, err);
        assert!(gateway.calls().is_empty());
    }
}
