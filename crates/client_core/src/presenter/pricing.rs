use std::sync::Arc;

use shared::domain::{Destination, Interest, LeadRecord};
use tracing::debug;

use super::{invalid_fields, render, Confirmation, FormView, SubmitAttempt};
use crate::{controller::LeadController, gateway::PersistenceGateway};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: Interest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingField {
    Name,
    Email,
    Phone,
}

impl PricingFields {
    fn invalid_fields(&self) -> Vec<&'static str> {
        invalid_fields(
            &[
                ("name", self.name.as_str()),
                ("email", self.email.as_str()),
                ("phone", self.phone.as_str()),
            ],
            &self.email,
        )
    }

    fn to_record(&self) -> LeadRecord {
        LeadRecord::inquiry(
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.interest,
        )
    }
}

/// Pricing and availability modal. Only an explicit close resets it.
pub struct PricingPresenter {
    controller: Arc<LeadController>,
    fields: PricingFields,
    open: bool,
}

impl PricingPresenter {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self::with_controller(Arc::new(LeadController::new(gateway, Destination::Leads)))
    }

    pub fn with_controller(controller: Arc<LeadController>) -> Self {
        Self {
            controller,
            fields: PricingFields::default(),
            open: false,
        }
    }

    pub fn controller(&self) -> &Arc<LeadController> {
        &self.controller
    }

    pub fn fields(&self) -> &PricingFields {
        &self.fields
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Dismissal: resets the controller, clears the inputs and hides the modal.
    pub fn close(&mut self) {
        self.controller.reset();
        self.fields = PricingFields::default();
        self.open = false;
    }

    pub fn set_field(&mut self, field: PricingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PricingField::Name => self.fields.name = value,
            PricingField::Email => self.fields.email = value,
            PricingField::Phone => self.fields.phone = value,
        }
    }

    pub fn set_interest(&mut self, interest: Interest) {
        self.fields.interest = interest;
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields.invalid_fields()
    }

    pub async fn submit(&mut self) -> SubmitAttempt {
        let invalid = self.fields.invalid_fields();
        if !invalid.is_empty() {
            debug!(?invalid, "pricing inquiry submit blocked");
            return SubmitAttempt::Blocked {
                invalid_fields: invalid,
            };
        }
        SubmitAttempt::Sent(self.controller.submit(self.fields.to_record()).await)
    }

    pub fn view(&self) -> FormView<PricingFields> {
        if !self.open {
            return FormView::Hidden;
        }
        let complete = self.fields.invalid_fields().is_empty();
        let name = self.fields.name.trim().to_string();
        let email = self.fields.email.trim().to_string();
        render(
            self.controller.snapshot(),
            self.fields.clone(),
            complete,
            || Confirmation {
                headline: "Request Received",
                detail: format!(
                    "Thank you, {name}. Our clinical team will review your request and send the current pricing guide to {email} shortly."
                ),
            },
        )
    }
}
