use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{Destination, DocumentId, LeadRecord},
    error::{ApiError, ErrorCode},
    protocol::{documents_route, AppendDocumentResponse},
};
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayErrorCode};

/// Append-only document store the controller submits records to.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn append(
        &self,
        destination: Destination,
        record: &LeadRecord,
    ) -> Result<DocumentId, GatewayError>;
}

pub struct MissingGateway;

#[async_trait]
impl PersistenceGateway for MissingGateway {
    async fn append(
        &self,
        destination: Destination,
        _record: &LeadRecord,
    ) -> Result<DocumentId, GatewayError> {
        Err(GatewayError::new(
            GatewayErrorCode::Unavailable,
            format!("no persistence gateway configured for '{destination}'"),
        ))
    }
}

/// Gateway client speaking the collections HTTP API.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn append(
        &self,
        destination: Destination,
        record: &LeadRecord,
    ) -> Result<DocumentId, GatewayError> {
        let url = format!("{}{}", self.base_url, documents_route(destination));
        debug!(%url, "posting document to gateway");

        let response = self
            .http
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = map_status_error(status, &body);
            warn!(%destination, %status, code = ?err.code, "gateway rejected document");
            return Err(err);
        }

        let created: AppendDocumentResponse = response.json().await.map_err(|e| {
            GatewayError::new(
                GatewayErrorCode::InvalidResponse,
                format!("undecodable gateway response: {e}"),
            )
        })?;
        Ok(created.document_id)
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    let code = if err.is_timeout() {
        Some(GatewayErrorCode::DeadlineExceeded)
    } else if err.is_connect() {
        Some(GatewayErrorCode::Unavailable)
    } else {
        None
    };
    GatewayError {
        code,
        message: err.to_string(),
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &str) -> GatewayError {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        let code = if api_error.code.is_rejection() {
            GatewayErrorCode::PermissionDenied
        } else if api_error.code == ErrorCode::RateLimited {
            GatewayErrorCode::Unavailable
        } else {
            GatewayErrorCode::Internal
        };
        return GatewayError::new(code, api_error.message);
    }

    let message = if body.trim().is_empty() {
        format!("gateway responded with {status}")
    } else {
        format!("gateway responded with {status}: {}", body.trim())
    };
    match status {
        // Oversized records are refused outright.
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::PAYLOAD_TOO_LARGE => {
            GatewayError::permission_denied(message)
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::TOO_MANY_REQUESTS => {
            GatewayError::new(GatewayErrorCode::Unavailable, message)
        }
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => {
            GatewayError::new(GatewayErrorCode::DeadlineExceeded, message)
        }
        status if status.is_server_error() => GatewayError::new(GatewayErrorCode::Internal, message),
        _ => GatewayError::uncoded(message),
    }
}
