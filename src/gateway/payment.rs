use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum PaymentStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failed")]
    Failed,
}

// PaymentOutcome is the answer of the gateway to a charge or a refund. Ids are set on
// success and the error reason on failure.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub refund_id: Option<String>,
    pub error: Option<String>,
}

impl PaymentOutcome {
    pub fn charged(transaction_id: &str) -> Self {
        Self {
            status: PaymentStatus::Success,
            transaction_id: Some(transaction_id.to_string()),
            refund_id: None,
            error: None,
        }
    }

    pub fn refunded(refund_id: &str) -> Self {
        Self {
            status: PaymentStatus::Success,
            transaction_id: None,
            refund_id: Some(refund_id.to_string()),
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            status: PaymentStatus::Failed,
            transaction_id: None,
            refund_id: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

// GatewayFault means the gateway never produced an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayFault {
    Timeout,
    Unreachable {
        message: String,
    },
}

impl Display for GatewayFault {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            GatewayFault::Timeout => write!(f, "Gateway timeout"),
            GatewayFault::Unreachable { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for GatewayFault {}

#[async_trait]
pub trait PaymentGateway: Sync + Send {
    async fn process_payment(&self, patron_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault>;

    async fn refund_payment(&self, transaction_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault>;
}

#[cfg(test)]
mod tests {
    use crate::gateway::payment::{GatewayFault, PaymentOutcome, PaymentStatus};

    #[tokio::test]
    async fn test_should_build_outcomes() {
        let outcome = PaymentOutcome::charged("TXN1234567");
        assert!(outcome.is_success());
        assert_eq!(Some("TXN1234567".to_string()), outcome.transaction_id);

        let outcome = PaymentOutcome::failed("Network error");
        assert_eq!(PaymentStatus::Failed, outcome.status);
        let json = serde_json::to_string(&outcome).expect("should serialize");
        assert!(json.contains(r#""status":"failed""#));

        assert_eq!("Gateway timeout", GatewayFault::Timeout.to_string());
        assert_eq!("connection reset", GatewayFault::Unreachable { message: "connection reset".to_string() }.to_string());
    }
}
