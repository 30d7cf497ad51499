use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum FeeStatus {
    #[serde(rename = "No borrow record found")]
    NoRecord,
    #[serde(rename = "On time")]
    OnTime,
    #[serde(rename = "Overdue")]
    Overdue,
}

impl Display for FeeStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FeeStatus::NoRecord => write!(f, "No borrow record found"),
            FeeStatus::OnTime => write!(f, "On time"),
            FeeStatus::Overdue => write!(f, "Overdue"),
        }
    }
}

// FeeResult is derived from the latest borrow record and never stored.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FeeResult {
    pub fee_amount: f64,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl FeeResult {
    pub fn no_record() -> Self {
        Self { fee_amount: 0.0, days_overdue: 0, status: FeeStatus::NoRecord }
    }

    pub fn on_time() -> Self {
        Self { fee_amount: 0.0, days_overdue: 0, status: FeeStatus::OnTime }
    }

    pub fn overdue(fee_amount: f64, days_overdue: i64) -> Self {
        Self { fee_amount, days_overdue, status: FeeStatus::Overdue }
    }

    pub fn has_fee(&self) -> bool {
        self.fee_amount > 0.0
    }
}
