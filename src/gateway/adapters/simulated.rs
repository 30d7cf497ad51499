use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use tracing::{info, warn};
use crate::gateway::payment::{GatewayFault, PaymentGateway, PaymentOutcome};

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TRANSACTION_ID_LEN: usize = 10;
const REFUND_ID_LEN: usize = 8;

// SimulatedPaymentGateway stands in for a remote processor: every call takes a short while
// and roughly one charge in ten fails. A non-zero fault rate makes calls time out instead.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentGateway {
    latency: Duration,
    success_rate: f64,
    fault_rate: f64,
}

impl SimulatedPaymentGateway {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(100),
            success_rate: 0.9,
            fault_rate: 0.0,
        }
    }

    pub fn with(latency: Duration, success_rate: f64) -> Self {
        Self {
            latency,
            success_rate,
            fault_rate: 0.0,
        }
    }

    pub fn with_fault_rate(mut self, fault_rate: f64) -> Self {
        self.fault_rate = fault_rate;
        self
    }

    fn fault(&self) -> Result<(), GatewayFault> {
        if self.fault_rate > 0.0 && roll(self.fault_rate) {
            warn!(fault_rate = self.fault_rate, "simulated gateway timed out");
            return Err(GatewayFault::Timeout);
        }
        Ok(())
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char).collect()
}

fn roll(success_rate: f64) -> bool {
    rand::thread_rng().gen_bool(success_rate.clamp(0.0, 1.0))
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn process_payment(&self, patron_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault> {
        tokio::time::sleep(self.latency).await;
        self.fault()?;
        if amount <= 0.0 {
            return Ok(PaymentOutcome::failed("Invalid amount"));
        }
        if roll(self.success_rate) {
            let transaction_id = random_id(TRANSACTION_ID_LEN);
            info!(patron_id, amount, transaction_id = %transaction_id, "simulated payment processed");
            Ok(PaymentOutcome::charged(transaction_id.as_str()))
        } else {
            warn!(patron_id, amount, "simulated payment failed");
            Ok(PaymentOutcome::failed("Network error"))
        }
    }

    async fn refund_payment(&self, transaction_id: &str, amount: f64) -> Result<PaymentOutcome, GatewayFault> {
        tokio::time::sleep(self.latency).await;
        self.fault()?;
        if transaction_id.is_empty() {
            return Ok(PaymentOutcome::failed("Missing transaction ID"));
        }
        if amount <= 0.0 {
            return Ok(PaymentOutcome::failed("Invalid refund amount"));
        }
        let refund_id = random_id(REFUND_ID_LEN);
        info!(transaction_id, amount, refund_id = %refund_id, "simulated refund processed");
        Ok(PaymentOutcome::refunded(refund_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use crate::gateway::adapters::simulated::SimulatedPaymentGateway;
    use crate::gateway::payment::{GatewayFault, PaymentGateway, PaymentStatus};

    fn is_id(id: &str, len: usize) -> bool {
        id.len() == len && id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[tokio::test]
    async fn test_should_charge_with_transaction_id() {
        let gateway = SimulatedPaymentGateway::with(Duration::from_millis(1), 1.0);
        let outcome = gateway.process_payment("123456", 6.5).await.expect("should answer");
        assert_eq!(PaymentStatus::Success, outcome.status);
        assert!(is_id(outcome.transaction_id.as_deref().unwrap_or_default(), 10));
    }

    #[tokio::test]
    async fn test_should_fail_when_unlucky_or_invalid() {
        let gateway = SimulatedPaymentGateway::with(Duration::from_millis(1), 0.0);
        let outcome = gateway.process_payment("123456", 6.5).await.expect("should answer");
        assert_eq!(Some("Network error".to_string()), outcome.error);

        let gateway = SimulatedPaymentGateway::with(Duration::from_millis(1), 1.0);
        let outcome = gateway.process_payment("123456", 0.0).await.expect("should answer");
        assert_eq!(Some("Invalid amount".to_string()), outcome.error);
    }

    #[tokio::test]
    async fn test_should_refund() {
        let gateway = SimulatedPaymentGateway::new();
        let outcome = gateway.refund_payment("TXN1234567", 6.5).await.expect("should answer");
        assert!(outcome.is_success());
        assert!(is_id(outcome.refund_id.as_deref().unwrap_or_default(), 8));

        let outcome = gateway.refund_payment("", 6.5).await.expect("should answer");
        assert_eq!(Some("Missing transaction ID".to_string()), outcome.error);
        let outcome = gateway.refund_payment("TXN1234567", -1.0).await.expect("should answer");
        assert_eq!(Some("Invalid refund amount".to_string()), outcome.error);
    }

    #[tokio::test]
    async fn test_should_time_out_at_full_fault_rate() {
        let gateway = SimulatedPaymentGateway::with(Duration::from_millis(1), 1.0).with_fault_rate(1.0);
        assert_eq!(Err(GatewayFault::Timeout), gateway.process_payment("123456", 6.5).await);
        assert_eq!(Err(GatewayFault::Timeout), gateway.refund_payment("TXN1234567", 6.5).await);
    }
}
