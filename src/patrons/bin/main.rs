use axum::{
    routing::get,
    Router,
};
use lambda_http::{run, Error};
use lms_lending::core::controller::AppState;
use lms_lending::core::repository::RepositoryStore;
use lms_lending::patrons::controller::patron_status;
use lms_lending::utils::logging::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let state = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        AppState::new("dev", RepositoryStore::LocalDynamoDB)
    } else {
        AppState::new("prod", RepositoryStore::DynamoDB)
    }.with_env_overrides();

    let app = Router::new()
        .route("/patrons/:patron_id/status", get(patron_status))
        .with_state(state);

    run(app).await
}
