//! Form presenters: raw field state, required-field gating, record shaping and per-phase views.

mod contact;
mod pricing;

pub use contact::{
    ContactField, ContactFields, ContactPresenter, CONTACT_AUTO_RESET_DELAY, CONTACT_SUBJECTS,
};
pub use pricing::{PricingField, PricingFields, PricingPresenter};

use shared::domain::looks_like_email;

use crate::controller::{ControllerSnapshot, Phase, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView<F> {
    Hidden,
    Editing {
        fields: F,
        error: Option<&'static str>,
        submit_enabled: bool,
    },
    Submitting {
        fields: F,
    },
    Confirmation(Confirmation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub headline: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Required fields are empty or malformed; the controller was not invoked.
    Blocked { invalid_fields: Vec<&'static str> },
    Sent(SubmitOutcome),
}

fn invalid_fields(required: &[(&'static str, &str)], email: &str) -> Vec<&'static str> {
    let mut invalid: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !email.trim().is_empty() && !looks_like_email(email) {
        invalid.push("email");
    }
    invalid
}

fn render<F>(
    snapshot: ControllerSnapshot,
    fields: F,
    fields_complete: bool,
    confirmation: impl FnOnce() -> Confirmation,
) -> FormView<F> {
    match snapshot.phase {
        Phase::Idle | Phase::Failed => FormView::Editing {
            fields,
            error: snapshot.last_error.map(|category| category.user_message()),
            submit_enabled: fields_complete,
        },
        Phase::Submitting => FormView::Submitting { fields },
        Phase::Success => FormView::Confirmation(confirmation()),
    }
}
