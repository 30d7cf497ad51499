use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::GatewayVia;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppState {
    pub config: Configuration,
    pub store: RepositoryStore,
    pub gateway: GatewayVia,
}

impl AppState {
    pub fn new(branch: &str, store: RepositoryStore) -> AppState {
        AppState {
            config: Configuration::new(branch),
            store,
            gateway: GatewayVia::Simulated,
        }
    }

    // LMS_REPOSITORY_STORE overrides the store picked by the binary
    pub fn with_env_overrides(mut self) -> AppState {
        if let Ok(store) = std::env::var("LMS_REPOSITORY_STORE") {
            self.store = RepositoryStore::from(store);
        }
        self
    }
}

pub type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::DuplicateKey { message } => {
                (StatusCode::CONFLICT, message)
            }
            CommandError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, message)
            }
            CommandError::Policy { message, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            CommandError::PaymentDeclined { message } => {
                (StatusCode::PAYMENT_REQUIRED, message)
            }
            CommandError::PaymentProcessing { message } => {
                (StatusCode::BAD_GATEWAY, message)
            }
            CommandError::Runtime { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, message)
            }
        }
    }
}
