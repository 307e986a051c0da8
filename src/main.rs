use clap::Parser;
use voice_assist::cli::commands::{cmd_run, cmd_scan, cmd_summarize};
use voice_assist::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref());

    // Resolve API settings: CLI > config file > defaults
    if let Some(endpoint) = cli.api_endpoint.as_deref() {
        config.api.endpoint = endpoint.to_string();
    }
    if let Some(model) = cli.api_model.as_deref() {
        config.api.model = model.to_string();
    }

    match cli.command {
        Commands::Scan { page } => {
            cmd_scan(&page, cli.verbose)?;
        }
        Commands::Summarize { page, mode } => {
            cmd_summarize(&page, &mode, &config, cli.verbose)?;
        }
        Commands::Run { page, trace } => {
            cmd_run(&page, trace.as_deref(), &config)?;
        }
    }

    Ok(())
}
