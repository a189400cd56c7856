use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{append_document, parse_destination, ApiContext};
use shared::{
    domain::LeadRecord,
    error::{ApiError, ErrorCode},
    protocol::AppendDocumentResponse,
};
use storage::Storage;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, normalize_database_url};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "lead gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
    }
    info!("shutting down lead gateway");
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/collections/:destination/documents", post(http_append_document))
        // Checked by the Json extractor; the handler turns the 413 into an ApiError.
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        warn!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_append_document(
    State(state): State<Arc<AppState>>,
    Path(destination): Path<String>,
    payload: Result<Json<LeadRecord>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AppendDocumentResponse>)> {
    let destination = parse_destination(&destination).map_err(api_error)?;
    let Json(record) = payload.map_err(|rejection| {
        let err = ApiError::validation(format!("invalid document body: {}", rejection.body_text()));
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return (StatusCode::PAYLOAD_TOO_LARGE, Json(err));
        }
        api_error(err)
    })?;

    let response = append_document(&state.api, destination, record)
        .await
        .map_err(|err| {
            if err.code == ErrorCode::Internal {
                error!(%destination, message = %err.message, "append failed");
            } else {
                info!(%destination, code = ?err.code, message = %err.message, "append rejected");
            }
            api_error(err)
        })?;

    Ok((StatusCode::CREATED, Json(response)))
}

fn api_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(err.code), Json(err))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
