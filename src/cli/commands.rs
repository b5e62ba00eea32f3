//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "netrec")]
#[command(about = "NetRec CLI for ingestion, indexing, and recommendation queries")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database schema and indexes
    Init,
    /// Ingestion commands (offline, destructive reloads)
    #[command(subcommand)]
    Ingest(IngestCommands),
    /// Rebuild the vector index from stored bio documents
    Index,
    /// Rebuild the affiliation graph from user records
    Graph,
    /// Route a one-shot recommendation request
    Ask {
        /// Natural-language request, e.g. "Find users who work at Acme"
        prompt: String,
        /// Override the configured classifier ("rule" or "llm")
        #[arg(long)]
        classifier: Option<String>,
    },
    /// Start the API server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS
        #[arg(long)]
        no_cors: bool,
    },
    /// Show store statistics
    Stats,
}

#[derive(Subcommand)]
pub enum IngestCommands {
    /// Load structured user records from a CSV file
    Profiles {
        /// Path to the users CSV file
        path: String,
    },
    /// Merge unstructured bio fragments and store bio documents
    Bios {
        /// Directory of per-user fragment directories
        dir: String,
        /// Also write the merged documents as JSONL to this path
        #[arg(long)]
        jsonl_out: Option<String>,
    },
}
