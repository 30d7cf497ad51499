use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fees::dto::FeeResult;
use crate::lending::domain::LendingService;
use crate::lending::dto::{BorrowRecordDto, ReturnReceipt};

pub struct ReturnBookCommand {
    lending_service: Box<dyn LendingService>,
}

impl ReturnBookCommand {
    pub fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReturnBookCommandRequest {
    pub patron_id: String,
    pub book_id: String,
}

impl ReturnBookCommandRequest {
    pub fn new(patron_id: &str, book_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReturnBookCommandResponse {
    pub message: String,
    pub record: BorrowRecordDto,
    pub fee: FeeResult,
}

impl ReturnBookCommandResponse {
    pub fn new(receipt: ReturnReceipt) -> Self {
        Self {
            message: receipt.message,
            record: receipt.record,
            fee: receipt.fee,
        }
    }
}

#[async_trait]
impl Command<ReturnBookCommandRequest, ReturnBookCommandResponse> for ReturnBookCommand {
    async fn execute(&self, req: ReturnBookCommandRequest) -> Result<ReturnBookCommandResponse, CommandError> {
        self.lending_service.return_book(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(ReturnBookCommandResponse::new)
    }
}
