//! CLI entry point for the industry classification store.

use std::fs::File;
use std::io::BufReader;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use taxonomy_graph::GraphClient;

use industry_classifications::{AppConfig, ClassificationStore};

#[derive(Parser)]
#[command(name = "industry-classifications")]
#[command(about = "Read and write industry classifications in the taxonomy graph")]
struct Cli {
    /// Config file prefix (default: classifications).
    #[arg(short, long, default_value = "classifications", global = true)]
    config: String,

    /// Transaction id for log correlation (generated if omitted).
    #[arg(long, global = true)]
    tid: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the uniqueness constraints.
    Init,
    /// Verify the graph is reachable.
    Check,
    /// Print the number of stored industry classifications.
    Count,
    /// Print an industry classification as JSON.
    Read { uuid: String },
    /// Write an industry classification from a JSON file.
    Write {
        file: String,
        /// Expected uuid; must match the payload.
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Delete an industry classification.
    Delete { uuid: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    let tid = cli
        .tid
        .clone()
        .unwrap_or_else(|| format!("tid_{}", uuid::Uuid::new_v4().simple()));

    let graph = GraphClient::connect(&config.neo4j).await?;
    let store = ClassificationStore::new(graph.clone(), graph, config.store);

    match cli.command {
        Command::Init => {
            store.initialise().await?;
        }
        Command::Check => {
            store.check().await?;
            println!("ok");
        }
        Command::Count => {
            println!("{}", store.count().await?);
        }
        Command::Read { uuid } => match store.read(&uuid, &tid).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => anyhow::bail!("Industry classification {uuid} not found"),
        },
        Command::Write { file, uuid } => {
            let (record, payload_uuid) = store.decode_json(BufReader::new(File::open(&file)?))?;
            if let Some(expected) = uuid {
                if expected != payload_uuid {
                    anyhow::bail!("Uuid {expected} does not match payload uuid {payload_uuid}");
                }
            }
            store.write(&record, &tid).await?;
        }
        Command::Delete { uuid } => {
            if !store.delete(&uuid, &tid).await? {
                anyhow::bail!("Industry classification {uuid} not found");
            }
        }
    }

    Ok(())
}
