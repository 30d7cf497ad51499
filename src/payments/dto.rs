use serde::{Deserialize, Serialize};

// PaymentReceipt confirms a late fee charged through the gateway.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub message: String,
    pub patron_id: String,
    pub book_id: String,
    pub amount: f64,
    pub transaction_id: String,
}

// RefundReceipt confirms a refund issued through the gateway.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RefundReceipt {
    pub message: String,
    pub transaction_id: String,
    pub amount: f64,
    pub refund_id: String,
}
