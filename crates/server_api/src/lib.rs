use shared::{
    domain::{looks_like_email, Destination, LeadRecord},
    error::{ApiError, ErrorCode},
    protocol::{AppendDocumentResponse, DocumentSummary},
};
use storage::Storage;
use tracing::info;

pub const MAX_FIELD_BYTES: usize = 2000;
pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 500;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn parse_destination(raw: &str) -> Result<Destination, ApiError> {
    Destination::parse(raw).ok_or_else(|| {
        ApiError::new(
            ErrorCode::NotFound,
            format!("unknown collection '{raw}'"),
        )
    })
}

pub async fn append_document(
    ctx: &ApiContext,
    destination: Destination,
    record: LeadRecord,
) -> Result<AppendDocumentResponse, ApiError> {
    let record = normalize_record(record);
    validate_record(destination, &record)?;

    let stored = ctx
        .storage
        .append_document(destination, &record)
        .await
        .map_err(internal)?;
    info!(
        document_id = %stored.document_id,
        %destination,
        "lead document stored"
    );

    Ok(AppendDocumentResponse {
        document_id: stored.document_id,
        destination: stored.destination,
        created_at: stored.created_at,
    })
}

pub async fn list_documents(
    ctx: &ApiContext,
    destination: Destination,
    limit: Option<u32>,
) -> Result<Vec<DocumentSummary>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let documents = ctx
        .storage
        .list_documents(destination, limit)
        .await
        .map_err(internal)?;
    Ok(documents
        .into_iter()
        .map(|document| DocumentSummary {
            document_id: document.document_id,
            destination: document.destination,
            record: document.record,
            created_at: document.created_at,
        })
        .collect())
}

fn normalize_record(record: LeadRecord) -> LeadRecord {
    fn trimmed(value: String) -> String {
        value.trim().to_string()
    }
    fn trimmed_opt(value: Option<String>) -> Option<String> {
        value.map(trimmed).filter(|v| !v.is_empty())
    }

    LeadRecord {
        name: trimmed(record.name),
        email: trimmed(record.email),
        phone: trimmed(record.phone),
        interest: record.interest,
        subject: trimmed_opt(record.subject),
        message: trimmed_opt(record.message),
    }
}

fn validate_record(destination: Destination, record: &LeadRecord) -> Result<(), ApiError> {
    require_text("name", &record.name)?;
    require_text("email", &record.email)?;
    require_text("phone", &record.phone)?;
    if !looks_like_email(&record.email) {
        return Err(ApiError::validation("email is not a valid address"));
    }
    for (field, value) in [("subject", &record.subject), ("message", &record.message)] {
        if let Some(value) = value {
            limit_text(field, value)?;
        }
    }

    match destination {
        Destination::Leads if record.interest.is_none() => {
            Err(ApiError::validation("interest is required for leads"))
        }
        Destination::Messages if record.message.is_none() => {
            Err(ApiError::validation("message is required for messages"))
        }
        _ => Ok(()),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    limit_text(field, value)
}

fn limit_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.len() > MAX_FIELD_BYTES {
        return Err(ApiError::validation(format!(
            "{field} exceeds {MAX_FIELD_BYTES} bytes"
        )));
    }
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}
