use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use server_api::{list_documents, ApiContext};
use shared::domain::Destination;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/leads.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the newest documents of a collection as JSON lines.
    List {
        destination: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Count {
        destination: String,
    },
}

fn destination(raw: &str) -> Result<Destination> {
    Destination::parse(raw).ok_or_else(|| anyhow!("unknown collection '{raw}' (expected leads or messages)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::List { destination: raw, limit } => {
            let ctx = ApiContext { storage };
            let documents = list_documents(&ctx, destination(&raw)?, limit).await?;
            for document in documents {
                println!("{}", serde_json::to_string(&document)?);
            }
        }
        Command::Count { destination: raw } => {
            let destination = destination(&raw)?;
            let count = storage.count_documents(destination).await?;
            println!("{destination}: {count}");
        }
    }

    Ok(())
}
