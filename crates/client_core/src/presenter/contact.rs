use std::{sync::Arc, time::Duration};

use shared::domain::{Destination, Interest, LeadRecord};
use tokio::sync::watch;
use tracing::debug;

use super::{invalid_fields, render, Confirmation, FormView, SubmitAttempt};
use crate::{
    controller::{LeadController, SubmitOutcome},
    gateway::PersistenceGateway,
    schedule::ScheduledAction,
};

pub const CONTACT_AUTO_RESET_DELAY: Duration = Duration::from_secs(5);

/// `(value, label)` pairs offered by the subject picker.
pub const CONTACT_SUBJECTS: [(&str, &str); 4] = [
    ("sales", "Sales Inquiry"),
    ("financing", "Financing Options"),
    ("support", "Technical Support"),
    ("other", "Other"),
];

const CONTACT_INTEREST: Interest = Interest::Buying;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl ContactFields {
    fn slot(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        }
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        let mut invalid = invalid_fields(
            &[
                ("name", self.name.as_str()),
                ("email", self.email.as_str()),
                ("phone", self.phone.as_str()),
                ("subject", self.subject.as_str()),
                ("message", self.message.as_str()),
            ],
            &self.email,
        );
        let subject = self.subject.trim();
        if !subject.is_empty() && !CONTACT_SUBJECTS.iter().any(|(value, _)| *value == subject) {
            invalid.push("subject");
        }
        invalid
    }

    fn to_record(&self) -> LeadRecord {
        LeadRecord {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            interest: Some(CONTACT_INTEREST),
            subject: Some(self.subject.trim().to_string()),
            message: Some(self.message.trim().to_string()),
        }
    }
}

/// Contact section form. Returns to a blank form on its own a few seconds after success.
pub struct ContactPresenter {
    controller: Arc<LeadController>,
    fields: Arc<watch::Sender<ContactFields>>,
    auto_reset: Option<ScheduledAction>,
    auto_reset_delay: Duration,
}

impl ContactPresenter {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self::with_controller(Arc::new(LeadController::new(
            gateway,
            Destination::Messages,
        )))
    }

    pub fn with_controller(controller: Arc<LeadController>) -> Self {
        let (fields, _) = watch::channel(ContactFields::default());
        Self {
            controller,
            fields: Arc::new(fields),
            auto_reset: None,
            auto_reset_delay: CONTACT_AUTO_RESET_DELAY,
        }
    }

    pub fn with_auto_reset_delay(mut self, delay: Duration) -> Self {
        self.auto_reset_delay = delay;
        self
    }

    pub fn controller(&self) -> &Arc<LeadController> {
        &self.controller
    }

    pub fn fields(&self) -> ContactFields {
        self.fields.borrow().clone()
    }

    pub fn subscribe_fields(&self) -> watch::Receiver<ContactFields> {
        self.fields.subscribe()
    }

    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        self.fields.send_modify(|fields| *fields.slot(field) = value);
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields.borrow().invalid_fields()
    }

    pub fn has_pending_auto_reset(&self) -> bool {
        self.auto_reset
            .as_ref()
            .is_some_and(|action| !action.is_finished())
    }

    pub async fn submit(&mut self) -> SubmitAttempt {
        let (invalid, record) = {
            let fields = self.fields.borrow();
            (fields.invalid_fields(), fields.to_record())
        };
        if !invalid.is_empty() {
            debug!(?invalid, "contact form submit blocked");
            return SubmitAttempt::Blocked {
                invalid_fields: invalid,
            };
        }

        let outcome = self.controller.submit(record).await;
        if matches!(outcome, SubmitOutcome::Stored(_)) {
            self.arm_auto_reset();
        }
        SubmitAttempt::Sent(outcome)
    }

    /// Manual reset: cancels any pending auto-reset, returns the controller to idle and clears the form.
    pub fn reset(&mut self) {
        self.auto_reset = None;
        self.controller.reset();
        self.fields.send_replace(ContactFields::default());
    }

    pub fn view(&self) -> FormView<ContactFields> {
        let fields = self.fields();
        let complete = fields.invalid_fields().is_empty();
        render(self.controller.snapshot(), fields, complete, || Confirmation {
            headline: "Message Sent",
            detail: "Thank you for reaching out. We usually respond within 2 hours during business hours."
                .to_string(),
        })
    }

    fn arm_auto_reset(&mut self) {
        let attempt = self.controller.snapshot().attempt();
        let controller = Arc::clone(&self.controller);
        let fields = Arc::clone(&self.fields);
        self.auto_reset = Some(ScheduledAction::after(self.auto_reset_delay, move || {
            if controller.reset_if_current(attempt) {
                fields.send_replace(ContactFields::default());
                debug!(attempt, "contact form auto-reset after success");
            }
        }));
    }
}
