use clap::Parser;
use netrec::cli::handlers;
use netrec::cli::Cli;
use netrec::cli::Commands;
use netrec::config::AppConfig;
use netrec::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    if cli.verbose {
        netrec::logging::init_logging_with_level("debug")?;
    } else {
        netrec::logging::init_logging_with_config(Some(&config))?;
    }

    match cli.command {
        Commands::Init => handlers::handle_init(&config).await,
        Commands::Ingest(command) => handlers::handle_ingest(&config, command).await,
        Commands::Index => handlers::handle_index(&config).await,
        Commands::Graph => handlers::handle_graph(&config).await,
        Commands::Ask { prompt, classifier } => {
            handlers::handle_ask(&config, &prompt, classifier).await
        }
        Commands::Serve {
            host,
            port,
            no_cors,
        } => handlers::handle_serve(&config, host, port, no_cors).await,
        Commands::Stats => handlers::handle_stats(&config).await,
    }
}
