use axum::{
    extract::State,
    response::Json,
};
use serde_json::Value;
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::payments::command::pay_late_fee_cmd::{PayLateFeeCommand, PayLateFeeCommandRequest, PayLateFeeCommandResponse};
use crate::payments::command::refund_late_fee_cmd::{RefundLateFeeCommand, RefundLateFeeCommandRequest, RefundLateFeeCommandResponse};
use crate::payments::domain::PaymentService;
use crate::payments::factory;

async fn build_service(state: AppState) -> Result<Box<dyn PaymentService>, ServerError> {
    Ok(factory::create_payment_service(&state.config, state.store, state.gateway).await.map_err(CommandError::from)?)
}

pub async fn pay_late_fee(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<PayLateFeeCommandResponse>, ServerError> {
    let req: PayLateFeeCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await?;
    let res = PayLateFeeCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn refund_late_fee(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<RefundLateFeeCommandResponse>, ServerError> {
    let req: RefundLateFeeCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await?;
    let res = RefundLateFeeCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
