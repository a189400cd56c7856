use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Destination, DocumentId, LeadRecord};

pub fn documents_route(destination: Destination) -> String {
    format!("/collections/{}/documents", destination.as_str())
}

/// Body returned by the gateway once a record has been durably appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendDocumentResponse {
    pub document_id: DocumentId,
    pub destination: Destination,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: DocumentId,
    pub destination: Destination,
    pub record: LeadRecord,
    pub created_at: DateTime<Utc>,
}
