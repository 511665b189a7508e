use clap::Parser;
use finance_engine::cli::{Cli, CliError, Command, render};
use finance_engine::config::EngineConfig;

#[tokio::main]
async fn main() {
    finance_engine::init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Serve { port } => finance_engine::api::run_http_server(port, config).await?,
        command => println!("{}", render(&command, &config)?),
    }
    Ok(())
}
