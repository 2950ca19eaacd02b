use crate::cli::Cli;
use crate::config::Config;
use crate::event::{self, Screened, ValidEvent};
use crate::extract::ExtractorClient;
use crate::google;
use crate::ics;
use crate::page;
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::Path;

/// How many events the selection menu shows. Exports always cover the
/// full recognized list; this only bounds the display.
const MAX_MENU_EVENTS: usize = 5;

pub struct Application;

impl Application {
    pub fn new() -> Self {
        Self
    }

    /// Runs one scan end to end: load the page, extract, screen, then
    /// hand the surviving events to the chosen export surface.
    pub async fn run(&self, cli: Cli) -> Result<()> {
        let config = Config::load()?;
        let endpoint =
            cli.endpoint.clone().unwrap_or_else(|| config.extractor.endpoint.clone());

        println!("🔎 Scanning {} for events...", cli.source);
        let page = page::load_page(&cli.source, cli.page_url.as_deref()).await?;
        if page.text.is_empty() {
            println!("⚠️ The page has no visible text to scan.");
            return Ok(());
        }

        let client = ExtractorClient::new(&endpoint);
        let raw_events = client.extract_events(&page.text).await?;
        if raw_events.is_empty() {
            println!("⚠️ The extraction service found no events on this page.");
            return Ok(());
        }

        let mut events = Vec::new();
        for screened in raw_events.into_iter().map(event::screen) {
            match screened {
                Screened::Valid(event) => events.push(event),
                Screened::Rejected { event, reason } => {
                    debug!("Skipping extracted record {:?}: {}", event.title, reason);
                }
            }
        }
        if events.is_empty() {
            println!("⚠️ No valid events found on this page.");
            return Ok(());
        }
        info!("{} of the extracted events passed screening", events.len());

        // Selection state lives for exactly one scan.
        let selection = Selection::new(events, page.url.clone());

        if cli.list {
            selection.print();
            return Ok(());
        }
        if let Some(path) = cli.ics.as_deref() {
            return selection.export_ics(path);
        }
        if let Some(number) = cli.open {
            let url = selection.google_url(number).ok_or_else(|| {
                anyhow!("No entry {} to open (showing 1-{})", number, selection.shown().len())
            })?;
            open_in_browser(&url);
            return Ok(());
        }

        selection.run_interactive(&config.export.ics_file)
    }
}

/// The events recognized in one scan plus the page they came from.
/// Created per scan; the interactive loop consumes it on dismissal.
pub struct Selection {
    events: Vec<ValidEvent>,
    page_url: String,
}

impl Selection {
    pub fn new(events: Vec<ValidEvent>, page_url: String) -> Self {
        Self { events, page_url }
    }

    /// The slice of events the menu displays.
    pub fn shown(&self) -> &[ValidEvent] {
        &self.events[..self.events.len().min(MAX_MENU_EVENTS)]
    }

    pub fn print(&self) {
        println!("\n✅ Found {} event(s) on {}:", self.events.len(), self.page_url);
        for (i, event) in self.shown().iter().enumerate() {
            println!("{}. {}", i + 1, event.display());
        }
        let hidden = self.events.len().saturating_sub(MAX_MENU_EVENTS);
        if hidden > 0 {
            println!("   ...and {} more (still included in ICS exports)", hidden);
        }
    }

    /// Builds the Google Calendar link for a 1-based menu entry.
    pub fn google_url(&self, number: usize) -> Option<String> {
        let event = self.shown().get(number.checked_sub(1)?)?;
        google::event_url(event.raw(), &self.page_url)
    }

    /// Writes every recognized event to an ICS file at `path`.
    pub fn export_ics(&self, path: &Path) -> Result<()> {
        let raw: Vec<_> = self.events.iter().map(|e| e.raw().clone()).collect();
        match ics::build_ics(&raw) {
            Some(document) => {
                std::fs::write(path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("📅 Wrote {} event(s) to {}", self.events.len(), path.display());
                Ok(())
            }
            None => {
                println!("⚠️ Nothing to export.");
                Ok(())
            }
        }
    }

    /// Menu loop over stdin. Consumes the selection: dismissing the menu
    /// is the end of this scan's state.
    fn run_interactive(self, ics_path: &Path) -> Result<()> {
        self.print();
        println!(
            "\nCommands: 1-{} open in Google Calendar, s save ICS to {}, q quit",
            self.shown().len(),
            ics_path.display()
        );

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut choice = String::new();
            if io::stdin().read_line(&mut choice)? == 0 {
                break; // EOF
            }
            let choice = choice.trim();
            match choice {
                "" | "0" | "q" | "quit" => break,
                "s" => self.export_ics(ics_path)?,
                _ => match choice.parse::<usize>() {
                    Ok(number) => match self.google_url(number) {
                        Some(url) => open_in_browser(&url),
                        None => println!("No such entry. Pick 1-{}.", self.shown().len()),
                    },
                    Err(_) => println!(
                        "Enter a number to open in Google Calendar, s to save ICS, or q to quit."
                    ),
                },
            }
        }

        debug!("Selection dismissed");
        Ok(())
    }
}

/// Opens the link in the system browser; the URL is printed first so it
/// survives headless terminals.
fn open_in_browser(url: &str) {
    println!("📅 {}", url);
    if let Err(e) = webbrowser::open(url) {
        warn!("Could not open browser: {}", e);
        println!("⚠️ Could not open a browser; use the URL above.");
    }
}
