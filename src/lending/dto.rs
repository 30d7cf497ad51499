use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::BorrowStatus;
use crate::fees::dto::FeeResult;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::utils::date::{opt_serializer, serializer};

// BorrowRecordDto is the loan as seen by the lending, payment and patron services.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BorrowRecordDto {
    pub borrow_id: String,
    pub version: i64,
    pub branch_id: String,
    pub patron_id: String,
    pub book_id: String,
    pub borrow_status: BorrowStatus,
    #[serde(with = "serializer")]
    pub borrowed_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub returned_at: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BorrowRecordDto {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

impl Identifiable for BorrowRecordDto {
    fn id(&self) -> String {
        self.borrow_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&BorrowRecordEntity> for BorrowRecordDto {
    fn from(other: &BorrowRecordEntity) -> BorrowRecordDto {
        BorrowRecordDto {
            borrow_id: other.borrow_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            patron_id: other.patron_id.to_string(),
            book_id: other.book_id.to_string(),
            borrow_status: other.borrow_status,
            borrowed_at: other.borrowed_at,
            due_at: other.due_at,
            returned_at: other.returned_at,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&BorrowRecordDto> for BorrowRecordEntity {
    fn from(other: &BorrowRecordDto) -> BorrowRecordEntity {
        BorrowRecordEntity {
            borrow_id: other.borrow_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            patron_id: other.patron_id.to_string(),
            book_id: other.book_id.to_string(),
            borrow_status: other.borrow_status,
            borrowed_at: other.borrowed_at,
            due_at: other.due_at,
            returned_at: other.returned_at,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

// BorrowReceipt confirms a successful borrow.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BorrowReceipt {
    pub message: String,
    pub record: BorrowRecordDto,
}

// ReturnReceipt confirms a successful return together with the late fee it incurred.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub message: String,
    pub record: BorrowRecordDto,
    pub fee: FeeResult,
}
