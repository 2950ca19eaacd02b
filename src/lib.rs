pub mod app;
pub mod cli;
pub mod config;
pub mod event;
pub mod extract;
pub mod google;
pub mod ics;
pub mod normalize;
pub mod page;

use anyhow::Result;

/// Runs one scan with the parsed command line.
pub async fn run(cli: cli::Cli) -> Result<()> {
    let app = app::Application::new();
    app.run(cli).await
}

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use event::{RawEvent, ValidEvent};
pub use normalize::EventTime;
