#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod chart;
pub mod config;
pub mod data;
pub mod models;
pub mod ui;
pub mod utils;

pub use chart::ChartSession;
pub use data::{FeedOptions, FeedSource};
pub use models::Tick;
pub use ui::PricePulseApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Trading pair to chart
    #[arg(long, default_value = "btcusdt")]
    pub symbol: String,

    /// Attach the live trade stream on top of the synthetic feed
    #[arg(long, default_value_t = false)]
    pub live: bool,

    /// Skip the quote fetch and seed from the fallback price
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> PricePulseApp {
    PricePulseApp::new(cc, args)
}
