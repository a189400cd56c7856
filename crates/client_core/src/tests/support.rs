use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{Destination, DocumentId, Interest, LeadRecord};
use tokio::sync::{Mutex, Notify};

use crate::{error::GatewayError, gateway::PersistenceGateway};

pub(crate) struct FakeGateway {
    failure: Option<GatewayError>,
    only_for: Option<Destination>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(Destination, LeadRecord)>>,
}

impl FakeGateway {
    pub(crate) fn accepting() -> Self {
        Self {
            failure: None,
            only_for: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(err: GatewayError) -> Self {
        Self {
            failure: Some(err),
            ..Self::accepting()
        }
    }

    /// Fails appends to `destination` only; everything else is accepted.
    pub(crate) fn failing_for(destination: Destination, err: GatewayError) -> Self {
        Self {
            failure: Some(err),
            only_for: Some(destination),
            ..Self::accepting()
        }
    }

    /// Holds every append until the returned `Notify` is signalled once per call.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub(crate) async fn calls(&self) -> Vec<(Destination, LeadRecord)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl PersistenceGateway for FakeGateway {
    async fn append(
        &self,
        destination: Destination,
        record: &LeadRecord,
    ) -> Result<DocumentId, GatewayError> {
        self.calls.lock().await.push((destination, record.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match (&self.failure, self.only_for) {
            (Some(err), None) => Err(err.clone()),
            (Some(err), Some(only)) if only == destination => Err(err.clone()),
            _ => Ok(DocumentId::new_v4()),
        }
    }
}

pub(crate) fn jane_inquiry() -> LeadRecord {
    LeadRecord::inquiry("Jane Doe", "jane@example.com", "5551234567", Interest::Clinic)
}
