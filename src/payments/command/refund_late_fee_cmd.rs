use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::core::command::{Command, CommandError};
use crate::payments::domain::PaymentService;
use crate::payments::dto::RefundReceipt;
use crate::utils::validation::{parse_refund_amount, parse_transaction_id};

pub struct RefundLateFeeCommand {
    payment_service: Box<dyn PaymentService>,
}

impl RefundLateFeeCommand {
    pub fn new(payment_service: Box<dyn PaymentService>) -> Self {
        Self {
            payment_service,
        }
    }
}

// Both fields are kept as raw JSON so that a missing or mistyped value is reported
// as an invalid transaction id or refund amount.
#[derive(Debug, Deserialize)]
pub struct RefundLateFeeCommandRequest {
    #[serde(default)]
    pub transaction_id: Value,
    #[serde(default)]
    pub amount: Value,
}

impl RefundLateFeeCommandRequest {
    pub fn new(transaction_id: &str, amount: f64) -> Self {
        Self {
            transaction_id: json!(transaction_id),
            amount: json!(amount),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefundLateFeeCommandResponse {
    pub receipt: RefundReceipt,
}

impl RefundLateFeeCommandResponse {
    pub fn new(receipt: RefundReceipt) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<RefundLateFeeCommandRequest, RefundLateFeeCommandResponse> for RefundLateFeeCommand {
    async fn execute(&self, req: RefundLateFeeCommandRequest) -> Result<RefundLateFeeCommandResponse, CommandError> {
        let transaction_id = parse_transaction_id(&req.transaction_id).map_err(CommandError::from)?;
        let amount = parse_refund_amount(&req.amount).map_err(CommandError::from)?;
        self.payment_service.refund_late_fee(transaction_id, amount)
            .await.map_err(CommandError::from).map(RefundLateFeeCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use serde_json::json;
    use crate::core::command::{Command, CommandError};
    use crate::core::library::reason;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::gateway::GatewayVia;
    use crate::payments::command::refund_late_fee_cmd::{RefundLateFeeCommand, RefundLateFeeCommandRequest};
    use crate::payments::factory;

    lazy_static! {
        static ref SUT_CMD : AsyncOnce<RefundLateFeeCommand> = AsyncOnce::new(async {
                let svc = factory::create_payment_service(&Configuration::new("test"), RepositoryStore::InMemory,
                                                          GatewayVia::Simulated)
                    .await.expect("should create payment service");
                RefundLateFeeCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_refund_late_fee() {
        let cmd = SUT_CMD.get().await;
        let res = cmd.execute(RefundLateFeeCommandRequest::new("TXN1234567", 6.5))
            .await.expect("simulated refunds always succeed");
        assert!(res.receipt.message.starts_with("Refund of $6.50 issued successfully. Refund ID: "));
        assert_eq!(8, res.receipt.refund_id.len());

        let err = cmd.execute(RefundLateFeeCommandRequest::new("TXN1234567", 0.0))
            .await.expect_err("invalid amount");
        assert!(matches!(err, CommandError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_should_reject_mistyped_refund_body() {
        let cmd = SUT_CMD.get().await;
        let amount_bodies = [
            json!({"transaction_id": "TXN1234567", "amount": "abc"}),
            json!({"transaction_id": "TXN1234567", "amount": null}),
            json!({"transaction_id": "TXN1234567"}),
        ];
        for body in amount_bodies {
            let req: RefundLateFeeCommandRequest = serde_json::from_value(body).expect("should parse body");
            let err = cmd.execute(req).await.expect_err("invalid amount");
            assert_eq!(CommandError::Validation {
                message: "Invalid refund amount.".to_string(),
                reason_code: Some(reason::INVALID_AMOUNT.to_string()),
            }, err);
        }
        let transaction_bodies = [
            json!({"transaction_id": 12345, "amount": 6.5}),
            json!({"transaction_id": null, "amount": 6.5}),
            json!({"amount": 6.5}),
        ];
        for body in transaction_bodies {
            let req: RefundLateFeeCommandRequest = serde_json::from_value(body).expect("should parse body");
            let err = cmd.execute(req).await.expect_err("invalid transaction id");
            assert_eq!(CommandError::Validation {
                message: "Invalid transaction ID.".to_string(),
                reason_code: Some(reason::INVALID_TRANSACTION.to_string()),
            }, err);
        }
    }
}
