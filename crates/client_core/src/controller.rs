//! Submission lifecycle for one presenting form: phase tracking, gateway call, error mapping.

use std::sync::Arc;

use shared::domain::{Destination, DocumentId, LeadRecord};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{error::ErrorCategory, gateway::PersistenceGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    GatewayAccepted,
    GatewayRejected(ErrorCategory),
    Reset,
}

/// Next phase for `event` arriving in `phase`.
///
/// `Submit` while `Submitting` leaves the phase alone; gateway completions only move a
/// `Submitting` machine.
pub fn transition(phase: Phase, event: SubmissionEvent) -> Phase {
    match (phase, event) {
        (_, SubmissionEvent::Reset) => Phase::Idle,
        (_, SubmissionEvent::Submit) => Phase::Submitting,
        (Phase::Submitting, SubmissionEvent::GatewayAccepted) => Phase::Success,
        (Phase::Submitting, SubmissionEvent::GatewayRejected(_)) => Phase::Failed,
        (other, SubmissionEvent::GatewayAccepted | SubmissionEvent::GatewayRejected(_)) => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    pub last_error: Option<ErrorCategory>,
    attempt: u64,
}

impl ControllerSnapshot {
    /// Counter bumped whenever a new submission starts or a non-idle machine is reset.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    fn apply(self, event: SubmissionEvent) -> Self {
        let mut next = self;
        next.phase = transition(self.phase, event);
        match event {
            SubmissionEvent::Submit if self.phase != Phase::Submitting => {
                next.attempt += 1;
                next.last_error = None;
            }
            SubmissionEvent::GatewayAccepted if self.phase == Phase::Submitting => {
                next.last_error = None;
            }
            SubmissionEvent::GatewayRejected(category) if self.phase == Phase::Submitting => {
                next.last_error = Some(category);
            }
            SubmissionEvent::Reset => {
                if self.phase != Phase::Idle {
                    next.attempt += 1;
                }
                next.last_error = None;
            }
            _ => {}
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Stored(DocumentId),
    Failed(ErrorCategory),
    /// A submission was already in flight; the gateway was not called.
    Ignored,
    /// The controller was reset while the gateway call was pending; its result was dropped.
    Discarded,
}

pub struct LeadController {
    gateway: Arc<dyn PersistenceGateway>,
    destination: Destination,
    state: watch::Sender<ControllerSnapshot>,
}

impl LeadController {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, destination: Destination) -> Self {
        let (state, _) = watch::channel(ControllerSnapshot::default());
        Self {
            gateway,
            destination,
            state,
        }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        *self.state.borrow()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn last_error(&self) -> Option<ErrorCategory> {
        self.state.borrow().last_error
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.state.subscribe()
    }

    /// Sends `record` to the gateway once and records the outcome as state.
    ///
    /// Never returns an error: gateway failures end in `Phase::Failed`.
    pub async fn submit(&self, record: LeadRecord) -> SubmitOutcome {
        let destination = self.destination;
        let mut started = None;
        self.state.send_if_modified(|state| {
            if state.phase == Phase::Submitting {
                return false;
            }
            *state = state.apply(SubmissionEvent::Submit);
            started = Some(state.attempt);
            true
        });
        let Some(attempt) = started else {
            debug!(%destination, "submit ignored while a submission is in flight");
            return SubmitOutcome::Ignored;
        };

        info!(%destination, attempt, "submitting lead record");
        let (event, outcome) = match self.gateway.append(destination, &record).await {
            Ok(document_id) => {
                info!(%destination, attempt, %document_id, "lead record stored");
                (
                    SubmissionEvent::GatewayAccepted,
                    SubmitOutcome::Stored(document_id),
                )
            }
            Err(error) => {
                let category = ErrorCategory::from_gateway_error(&error);
                warn!(%destination, attempt, %error, ?category, "lead submission failed");
                (
                    SubmissionEvent::GatewayRejected(category),
                    SubmitOutcome::Failed(category),
                )
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if state.attempt != attempt || state.phase != Phase::Submitting {
                return false;
            }
            *state = state.apply(event);
            true
        });
        if !applied {
            debug!(%destination, attempt, "dropping gateway result for superseded submission");
            return SubmitOutcome::Discarded;
        }
        outcome
    }

    /// Returns to `Idle` from any phase. Calling it on an idle controller changes nothing.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            let next = state.apply(SubmissionEvent::Reset);
            if next == *state {
                return false;
            }
            debug!(destination = %self.destination, from = ?state.phase, "controller reset");
            *state = next;
            true
        });
    }

    /// Resets only if `attempt` is still the current one and it ended in `Success`.
    pub fn reset_if_current(&self, attempt: u64) -> bool {
        self.state.send_if_modified(|state| {
            if state.attempt != attempt || state.phase != Phase::Success {
                return false;
            }
            *state = state.apply(SubmissionEvent::Reset);
            true
        })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
