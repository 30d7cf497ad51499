use std::sync::Mutex;
use async_trait::async_trait;
use crate::gateway::payment::{GatewayFault, PaymentGateway, PaymentOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Payment { patron_id: String, amount: f64 },
    Refund { transaction_id: String, amount: f64 },
}

// StubPaymentGateway answers every call with a canned reply and records what it was asked.
#[derive(Debug)]
pub struct StubPaymentGateway {
    reply: Result<PaymentOutcome, GatewayFault>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl StubPaymentGateway {
    pub fn replying(reply: Result<PaymentOutcome, GatewayFault>) -> Self {
        Self {
            reply,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: GatewayCall) -> Result<PaymentOutcome, GatewayFault> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        self.reply.clone()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn process_payment(&self, patron_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault> {
        self.record(GatewayCall::Payment { patron_id: patron_id.to_string(), amount })
    }

    async fn refund_payment(&self, transaction_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault> {
        self.record(GatewayCall::Refund { transaction_id: transaction_id.to_string(), amount })
    }
}
