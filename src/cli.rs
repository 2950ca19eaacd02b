use clap::Parser;
use std::path::PathBuf;

/// eventscan - scan a web page for events and export them to your calendar
#[derive(Debug, Parser)]
#[command(name = "eventscan")]
#[command(about = "Scan a web page for events and export them to ICS or Google Calendar", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Page to scan: an http(s) URL, a local HTML file, or '-' for stdin
    pub source: String,

    /// Extraction service endpoint (overrides the configured one)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Write all recognized events to an ICS file and exit
    #[arg(long, value_name = "FILE")]
    pub ics: Option<PathBuf>,

    /// Open entry N in Google Calendar and exit
    #[arg(long, value_name = "N", conflicts_with = "ics")]
    pub open: Option<usize>,

    /// Print the recognized events and exit
    #[arg(long, conflicts_with_all = ["ics", "open"])]
    pub list: bool,

    /// Source page URL recorded in exported events (defaults to the scanned location)
    #[arg(long, value_name = "URL")]
    pub page_url: Option<String>,
}
