use crate::core::search::SearchOrchestrator;
use crate::domain::ports::ServiceDirectory;
use crate::utils::error::AdapterError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const HEALTH_MESSAGE: &str = "tan-adapter is running";

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AdapterError::UnsupportedCategory { .. } => (StatusCode::BAD_REQUEST, "Bad Request"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        let body = json!({
            "statusCode": status.as_u16(),
            "message": self.user_friendly_message(),
            "error": error,
        });
        (status, Json(body)).into_response()
    }
}

pub fn app_router<D: ServiceDirectory + 'static>(orchestrator: Arc<SearchOrchestrator<D>>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/mobility/search", post(mobility_search::<D>))
        .with_state(orchestrator)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn mobility_search<D: ServiceDirectory + 'static>(
    State(orchestrator): State<Arc<SearchOrchestrator<D>>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AdapterError> {
    tracing::info!("Search request received");
    let response = orchestrator.handle_search(&body).await?;
    Ok(Json(response))
}
