//! Lead-capture submission engine: gateway seam, submission controller and form presenters.

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod presenter;
pub mod schedule;

pub use controller::{
    transition, ControllerSnapshot, LeadController, Phase, SubmissionEvent, SubmitOutcome,
};
pub use error::{ErrorCategory, GatewayError, GatewayErrorCode};
pub use gateway::{HttpGateway, MissingGateway, PersistenceGateway};
pub use presenter::{
    Confirmation, ContactField, ContactFields, ContactPresenter, FormView, PricingField,
    PricingFields, PricingPresenter, SubmitAttempt,
};
pub use schedule::ScheduledAction;

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod gateway_tests;

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod presenter_tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
