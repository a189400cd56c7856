use std::{sync::Arc, time::Duration};

use shared::domain::{Destination, Interest};

use crate::{
    controller::{LeadController, Phase, SubmitOutcome},
    error::{ErrorCategory, GatewayError},
    presenter::{
        Confirmation, ContactField, ContactFields, ContactPresenter, FormView, PricingField,
        PricingPresenter, SubmitAttempt, CONTACT_AUTO_RESET_DELAY,
    },
    test_support::FakeGateway,
};

fn filled_contact(gateway: Arc<FakeGateway>) -> ContactPresenter {
    let presenter = ContactPresenter::new(gateway);
    presenter.set_field(ContactField::Name, "Sam Carter");
    presenter.set_field(ContactField::Email, "sam@example.com");
    presenter.set_field(ContactField::Phone, "5550001111");
    presenter.set_field(ContactField::Subject, "financing");
    presenter.set_field(ContactField::Message, "Do you offer payment plans?");
    presenter
}

fn filled_pricing(gateway: Arc<FakeGateway>) -> PricingPresenter {
    let mut presenter = PricingPresenter::new(gateway);
    presenter.open();
    presenter.set_field(PricingField::Name, "Jane Doe");
    presenter.set_field(PricingField::Email, "jane@example.com");
    presenter.set_field(PricingField::Phone, "5551234567");
    presenter.set_interest(Interest::Clinic);
    presenter
}

#[tokio::test]
async fn empty_required_field_never_reaches_controller() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(Arc::clone(&gateway));
    presenter.set_field(ContactField::Phone, "   ");

    let attempt = presenter.submit().await;

    assert_eq!(
        attempt,
        SubmitAttempt::Blocked {
            invalid_fields: vec!["phone"]
        }
    );
    assert!(gateway.calls().await.is_empty());
    assert_eq!(presenter.controller().phase(), Phase::Idle);
}

#[tokio::test]
async fn malformed_email_and_unknown_subject_are_blocked() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(Arc::clone(&gateway));
    presenter.set_field(ContactField::Email, "sam.example.com");
    presenter.set_field(ContactField::Subject, "complaints");

    let attempt = presenter.submit().await;

    assert_eq!(
        attempt,
        SubmitAttempt::Blocked {
            invalid_fields: vec!["email", "subject"]
        }
    );
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn contact_record_carries_fixed_interest_and_message_destination() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(Arc::clone(&gateway));

    let attempt = presenter.submit().await;

    assert!(matches!(attempt, SubmitAttempt::Sent(SubmitOutcome::Stored(_))));
    let calls = gateway.calls().await;
    assert_eq!(calls.len(), 1);
    let (destination, record) = &calls[0];
    assert_eq!(*destination, Destination::Messages);
    assert_eq!(record.interest, Some(Interest::Buying));
    assert_eq!(record.subject.as_deref(), Some("financing"));
    assert_eq!(record.message.as_deref(), Some("Do you offer payment plans?"));
}

#[tokio::test]
async fn pricing_record_uses_chosen_interest_and_leads_destination() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_pricing(Arc::clone(&gateway));

    presenter.submit().await;

    let calls = gateway.calls().await;
    let (destination, record) = &calls[0];
    assert_eq!(*destination, Destination::Leads);
    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.interest, Some(Interest::Clinic));
    assert_eq!(record.subject, None);
    assert_eq!(record.message, None);
}

#[tokio::test(start_paused = true)]
async fn contact_form_auto_resets_after_delay() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(gateway);

    presenter.submit().await;
    assert_eq!(presenter.controller().phase(), Phase::Success);
    assert!(presenter.has_pending_auto_reset());
    assert!(matches!(presenter.view(), FormView::Confirmation(_)));

    tokio::time::sleep(CONTACT_AUTO_RESET_DELAY - Duration::from_millis(1)).await;
    assert_eq!(presenter.controller().phase(), Phase::Success);
    assert_eq!(presenter.fields().name, "Sam Carter");

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(presenter.controller().phase(), Phase::Idle);
    assert_eq!(presenter.fields(), ContactFields::default());
    assert!(!presenter.has_pending_auto_reset());
}

#[tokio::test(start_paused = true)]
async fn torn_down_contact_form_never_auto_resets() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(gateway);
    presenter.submit().await;

    let controller = Arc::clone(presenter.controller());
    let fields = presenter.subscribe_fields();
    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(presenter);

    tokio::time::sleep(CONTACT_AUTO_RESET_DELAY * 2).await;
    assert_eq!(controller.phase(), Phase::Success);
    assert_eq!(fields.borrow().name, "Sam Carter");
}

#[tokio::test(start_paused = true)]
async fn manual_reset_supersedes_pending_auto_reset() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(Arc::clone(&gateway));
    presenter.submit().await;

    presenter.reset();
    assert!(!presenter.has_pending_auto_reset());
    assert_eq!(presenter.controller().phase(), Phase::Idle);
    assert_eq!(presenter.fields(), ContactFields::default());

    presenter.set_field(ContactField::Name, "Second Visitor");
    tokio::time::sleep(CONTACT_AUTO_RESET_DELAY * 2).await;
    assert_eq!(presenter.fields().name, "Second Visitor");
}

#[tokio::test(start_paused = true)]
async fn direct_controller_reset_disarms_stale_timer() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_contact(Arc::clone(&gateway));
    presenter.submit().await;

    presenter.controller().reset();
    presenter.set_field(ContactField::Message, "Follow-up question");
    tokio::time::sleep(CONTACT_AUTO_RESET_DELAY * 2).await;

    assert_eq!(presenter.fields().message, "Follow-up question");
}

#[tokio::test]
async fn access_denied_keeps_fields_and_shows_banner() {
    let gateway = Arc::new(FakeGateway::failing(GatewayError::permission_denied(
        "rules rejected write",
    )));
    let mut presenter = filled_pricing(gateway);

    let attempt = presenter.submit().await;

    assert_eq!(
        attempt,
        SubmitAttempt::Sent(SubmitOutcome::Failed(ErrorCategory::AccessDenied))
    );
    assert_eq!(
        presenter.controller().last_error(),
        Some(ErrorCategory::AccessDenied)
    );
    match presenter.view() {
        FormView::Editing {
            fields,
            error,
            submit_enabled,
        } => {
            assert_eq!(fields.name, "Jane Doe");
            assert_eq!(fields.email, "jane@example.com");
            assert_eq!(error, Some(ErrorCategory::AccessDenied.user_message()));
            assert!(submit_enabled);
        }
        other => panic!("expected editing view, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_contact_submission_does_not_schedule_reset() {
    let gateway = Arc::new(FakeGateway::failing(GatewayError::uncoded("offline")));
    let mut presenter = filled_contact(gateway);

    presenter.submit().await;

    assert!(!presenter.has_pending_auto_reset());
    assert_eq!(presenter.fields().name, "Sam Carter");
}

#[tokio::test]
async fn submitting_view_disables_the_form() {
    let (gateway, gate) = FakeGateway::accepting().gated();
    let controller = Arc::new(LeadController::new(Arc::new(gateway), Destination::Leads));
    let mut presenter = PricingPresenter::with_controller(Arc::clone(&controller));
    presenter.open();
    presenter.set_field(PricingField::Name, "Jane Doe");
    presenter.set_field(PricingField::Email, "jane@example.com");
    presenter.set_field(PricingField::Phone, "5551234567");

    let mut rx = controller.subscribe();
    let task = tokio::spawn(async move {
        let attempt = presenter.submit().await;
        (presenter, attempt)
    });
    rx.wait_for(|s| s.phase == Phase::Submitting)
        .await
        .expect("submitting");

    // A second view over the same controller renders the in-flight state.
    let mut observer = PricingPresenter::with_controller(Arc::clone(&controller));
    observer.open();
    match observer.view() {
        FormView::Submitting { .. } => {}
        other => panic!("expected submitting view, got {other:?}"),
    }

    gate.notify_one();
    let (presenter, attempt) = task.await.expect("join");
    assert!(matches!(attempt, SubmitAttempt::Sent(SubmitOutcome::Stored(_))));
    assert!(matches!(presenter.view(), FormView::Confirmation(_)));
}

#[tokio::test]
async fn pricing_modal_waits_for_explicit_close() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = filled_pricing(gateway);
    presenter.submit().await;

    assert_eq!(
        presenter.view(),
        FormView::Confirmation(Confirmation {
            headline: "Request Received",
            detail: "Thank you, Jane Doe. Our clinical team will review your request and send the current pricing guide to jane@example.com shortly.".to_string(),
        })
    );

    presenter.close();
    assert!(!presenter.is_open());
    assert_eq!(presenter.view(), FormView::Hidden);
    assert_eq!(presenter.controller().phase(), Phase::Idle);
    assert_eq!(presenter.fields().name, "");
    assert_eq!(presenter.fields().interest, Interest::Buying);
}

#[tokio::test]
async fn editing_view_enables_submit_only_when_complete() {
    let gateway = Arc::new(FakeGateway::accepting());
    let mut presenter = PricingPresenter::new(gateway);
    presenter.open();
    presenter.set_field(PricingField::Name, "Jane Doe");

    let FormView::Editing { submit_enabled, error, .. } = presenter.view() else {
        panic!("expected editing view");
    };
    assert!(!submit_enabled);
    assert_eq!(error, None);

    presenter.set_field(PricingField::Email, "jane@example.com");
    presenter.set_field(PricingField::Phone, "5551234567");
    let FormView::Editing { submit_enabled, .. } = presenter.view() else {
        panic!("expected editing view");
    };
    assert!(submit_enabled);
}

#[tokio::test]
async fn concurrent_presenters_track_their_own_outcomes() {
    let gateway = Arc::new(FakeGateway::failing_for(
        Destination::Leads,
        GatewayError::permission_denied("leads locked"),
    ));
    let mut contact = filled_contact(Arc::clone(&gateway));
    let mut pricing = filled_pricing(Arc::clone(&gateway));

    let (contact_attempt, pricing_attempt) = tokio::join!(contact.submit(), pricing.submit());

    assert!(matches!(
        contact_attempt,
        SubmitAttempt::Sent(SubmitOutcome::Stored(_))
    ));
    assert_eq!(
        pricing_attempt,
        SubmitAttempt::Sent(SubmitOutcome::Failed(ErrorCategory::AccessDenied))
    );
    assert_eq!(contact.controller().phase(), Phase::Success);
    assert_eq!(pricing.controller().phase(), Phase::Failed);
    assert_eq!(contact.controller().last_error(), None);
}
