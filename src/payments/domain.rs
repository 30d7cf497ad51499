pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::payments::dto::{PaymentReceipt, RefundReceipt};

#[async_trait]
pub trait PaymentService: Sync + Send {
    // charges the current late fee of the latest loan of the book
    async fn pay_late_fees(&self, patron_id: &str, book_id: &str) -> LibraryResult<PaymentReceipt>;

    async fn refund_late_fee(&self, transaction_id: &str, amount: f64) -> LibraryResult<RefundReceipt>;
}
