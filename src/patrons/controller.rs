use axum::{
    extract::{Path, State},
    response::Json,
};
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, ServerError};
use crate::patrons::command::get_patron_status_cmd::{GetPatronStatusCommand, GetPatronStatusCommandRequest, GetPatronStatusCommandResponse};
use crate::patrons::domain::PatronService;
use crate::patrons::factory;

async fn build_service(state: AppState) -> Result<Box<dyn PatronService>, ServerError> {
    Ok(factory::create_patron_service(&state.config, state.store).await.map_err(CommandError::from)?)
}

pub async fn patron_status(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<GetPatronStatusCommandResponse>, ServerError> {
    let req = GetPatronStatusCommandRequest { patron_id };
    let svc = build_service(state).await?;
    let res = GetPatronStatusCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
