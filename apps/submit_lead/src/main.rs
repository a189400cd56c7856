use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_client_settings, validate_gateway_url},
    ContactField, ContactPresenter, FormView, HttpGateway, PersistenceGateway, PricingField,
    PricingPresenter, SubmitAttempt, SubmitOutcome,
};
use shared::domain::Interest;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides `client.toml` and `LEAD_GATEWAY_URL`.
    #[arg(long)]
    gateway_url: Option<String>,
    #[command(subcommand)]
    form: Form,
}

#[derive(Subcommand, Debug)]
enum Form {
    /// Pricing and availability request, stored under `leads`.
    Pricing {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "buying", value_parser = parse_interest)]
        interest: Interest,
    },
    /// Contact section message, stored under `messages`.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

fn parse_interest(raw: &str) -> Result<Interest, String> {
    Interest::parse(raw).ok_or_else(|| {
        let options: Vec<String> = Interest::ALL
            .iter()
            .map(|interest| format!("{interest} ({})", interest.label()))
            .collect();
        format!("expected one of: {}", options.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let gateway_url = match args.gateway_url {
        Some(url) => validate_gateway_url(&url)?,
        None => load_client_settings()?.gateway_url,
    };
    info!(%gateway_url, "using persistence gateway");
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(HttpGateway::new(gateway_url));

    let attempt = match args.form {
        Form::Pricing {
            name,
            email,
            phone,
            interest,
        } => {
            let mut modal = PricingPresenter::new(gateway);
            modal.open();
            modal.set_field(PricingField::Name, name);
            modal.set_field(PricingField::Email, email);
            modal.set_field(PricingField::Phone, phone);
            modal.set_interest(interest);
            let attempt = modal.submit().await;
            print_view(&modal.view());
            modal.close();
            attempt
        }
        Form::Contact {
            name,
            email,
            phone,
            subject,
            message,
        } => {
            let mut form = ContactPresenter::new(gateway);
            form.set_field(ContactField::Name, name);
            form.set_field(ContactField::Email, email);
            form.set_field(ContactField::Phone, phone);
            form.set_field(ContactField::Subject, subject);
            form.set_field(ContactField::Message, message);
            let attempt = form.submit().await;
            print_view(&form.view());
            attempt
        }
    };

    match attempt {
        SubmitAttempt::Blocked { invalid_fields } => {
            bail!("missing or invalid fields: {}", invalid_fields.join(", "))
        }
        SubmitAttempt::Sent(SubmitOutcome::Stored(document_id)) => {
            println!("document_id={document_id}");
            Ok(())
        }
        SubmitAttempt::Sent(SubmitOutcome::Failed(category)) => {
            bail!("{}", category.user_message())
        }
        SubmitAttempt::Sent(outcome) => bail!("submission not completed: {outcome:?}"),
    }
}

fn print_view<F>(view: &FormView<F>) {
    match view {
        FormView::Confirmation(confirmation) => {
            println!("{}", confirmation.headline);
            println!("{}", confirmation.detail);
        }
        FormView::Editing {
            error: Some(message),
            ..
        } => eprintln!("{message}"),
        _ => {}
    }
}
