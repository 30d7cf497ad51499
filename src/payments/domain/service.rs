use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::core::library::{reason, LibraryError, LibraryResult};
use crate::gateway::payment::PaymentGateway;
use crate::lending::domain::LendingService;
use crate::payments::domain::PaymentService;
use crate::payments::dto::{PaymentReceipt, RefundReceipt};
use crate::utils::validation::{validate_patron_id, validate_refund_amount, validate_transaction_id};

const UNKNOWN_ID: &str = "UNKNOWN";
const UNKNOWN_ERROR: &str = "Unknown error";

pub struct PaymentServiceImpl {
    lending_service: Box<dyn LendingService>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentServiceImpl {
    pub fn new(lending_service: Box<dyn LendingService>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            lending_service,
            gateway,
        }
    }
}

#[async_trait]
impl PaymentService for PaymentServiceImpl {
    async fn pay_late_fees(&self, patron_id: &str, book_id: &str) -> LibraryResult<PaymentReceipt> {
        validate_patron_id(patron_id)?;
        let fee = self.lending_service.late_fee(patron_id, book_id).await?;
        if !fee.has_fee() {
            return Err(LibraryError::policy("No outstanding late fee for this book.",
                                            Some(reason::NO_OUTSTANDING_FEE.to_string())));
        }
        let amount = fee.fee_amount;
        let outcome = self.gateway.process_payment(patron_id, amount).await.map_err(|fault| {
            warn!(patron_id, book_id, amount, error = %fault, "payment gateway fault");
            LibraryError::payment_processing(format!("Payment processing error: {}", fault).as_str())
        })?;
        if !outcome.is_success() {
            let error = outcome.error.as_deref().unwrap_or(UNKNOWN_ERROR);
            warn!(patron_id, book_id, amount, error, "payment declined");
            return Err(LibraryError::payment_declined(format!("Payment failed: {}", error).as_str()));
        }
        let transaction_id = outcome.transaction_id.unwrap_or_else(|| UNKNOWN_ID.to_string());
        info!(patron_id, book_id, amount, transaction_id = %transaction_id, "late fee paid");
        Ok(PaymentReceipt {
            message: format!("Late fee of ${:.2} paid successfully. Transaction ID: {}", amount, transaction_id),
            patron_id: patron_id.to_string(),
            book_id: book_id.to_string(),
            amount,
            transaction_id,
        })
    }

    async fn refund_late_fee(&self, transaction_id: &str, amount: f64) -> LibraryResult<RefundReceipt> {
        validate_transaction_id(transaction_id)?;
        validate_refund_amount(amount)?;
        let outcome = self.gateway.refund_payment(transaction_id, amount).await.map_err(|fault| {
            warn!(transaction_id, amount, error = %fault, "refund gateway fault");
            LibraryError::payment_processing(format!("Refund processing error: {}", fault).as_str())
        })?;
        if !outcome.is_success() {
            let error = outcome.error.as_deref().unwrap_or(UNKNOWN_ERROR);
            warn!(transaction_id, amount, error, "refund declined");
            return Err(LibraryError::payment_declined(format!("Refund failed: {}", error).as_str()));
        }
        let refund_id = outcome.refund_id.unwrap_or_else(|| UNKNOWN_ID.to_string());
        info!(transaction_id, amount, refund_id = %refund_id, "late fee refunded");
        Ok(RefundReceipt {
            message: format!("Refund of ${:.2} issued successfully. Refund ID: {}", amount, refund_id),
            transaction_id: transaction_id.to_string(),
            amount,
            refund_id,
        })
    }
}
