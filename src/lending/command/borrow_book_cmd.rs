use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::{BorrowReceipt, BorrowRecordDto};

pub struct BorrowBookCommand {
    lending_service: Box<dyn LendingService>,
}

impl BorrowBookCommand {
    pub fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BorrowBookCommandRequest {
    pub patron_id: String,
    pub book_id: String,
}

impl BorrowBookCommandRequest {
    pub fn new(patron_id: &str, book_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BorrowBookCommandResponse {
    pub message: String,
    pub record: BorrowRecordDto,
}

impl BorrowBookCommandResponse {
    pub fn new(receipt: BorrowReceipt) -> Self {
        Self {
            message: receipt.message,
            record: receipt.record,
        }
    }
}

#[async_trait]
impl Command<BorrowBookCommandRequest, BorrowBookCommandResponse> for BorrowBookCommand {
    async fn execute(&self, req: BorrowBookCommandRequest) -> Result<BorrowBookCommandResponse, CommandError> {
        self.lending_service.borrow(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(BorrowBookCommandResponse::new)
    }
}
