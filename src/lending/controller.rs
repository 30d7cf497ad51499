use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::lending::command::borrow_book_cmd::{BorrowBookCommand, BorrowBookCommandRequest, BorrowBookCommandResponse};
use crate::lending::command::late_fee_cmd::{LateFeeCommand, LateFeeCommandRequest, LateFeeCommandResponse};
use crate::lending::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest, ReturnBookCommandResponse};
use crate::lending::domain::LendingService;
use crate::lending::factory;

async fn build_service(state: AppState) -> Result<Box<dyn LendingService>, ServerError> {
    Ok(factory::create_lending_service(&state.config, state.store).await.map_err(CommandError::from)?)
}

pub async fn borrow_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<BorrowBookCommandResponse>, ServerError> {
    let req: BorrowBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await?;
    let res = BorrowBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn return_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<ReturnBookCommandResponse>, ServerError> {
    let req: ReturnBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await?;
    let res = ReturnBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn late_fee(
    State(state): State<AppState>,
    Path((patron_id, book_id)): Path<(String, String)>) -> Result<Json<LateFeeCommandResponse>, ServerError> {
    let req = LateFeeCommandRequest { patron_id, book_id };
    let svc = build_service(state).await?;
    let res = LateFeeCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
