use anyhow::Result;
use clap::Parser;
use eventscan::cli::Cli;
use log::error;

#[tokio::main]
async fn main() -> Result<()> {
    eventscan::init_logger();

    let cli = Cli::parse();
    if let Err(err) = eventscan::run(cli).await {
        error!("Scan failed: {:?}", err);
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
