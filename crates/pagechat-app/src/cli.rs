use clap::{Parser, Subcommand};

/// Pagechat -- index a web page and ask questions about it.
#[derive(Parser, Debug)]
#[command(name = "pagechat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Backend base URL override (e.g. http://127.0.0.1:8000).
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Chat panel embedded in the page; network calls go through the relay.
    Page {
        /// URL of the page being viewed.
        url: String,
    },
    /// Detached popup; asks the relay for the tab URL, then calls the backend itself.
    Popup {
        /// URL of the active tab, as known to the privileged context.
        #[arg(long)]
        tab_url: Option<String>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
