mod cli;
mod entry;
mod frontend;
mod view;

use std::path::Path;
use std::process::ExitCode;

use pagechat_common::{ConfigError, PagechatError};
use pagechat_config::PagechatConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::view::TerminalView;

const DEFAULT_LOG_DIRECTIVE: &str = "pagechat=info";

/// Filter directive from `--log-level`, else from the config file.
///
/// A bare level applies to the pagechat crates; anything containing `=`
/// is used as a full directive.
fn log_directive(cli_level: Option<&str>, config: &PagechatConfig) -> String {
    match cli_level {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("pagechat={level}"),
        None => format!("pagechat={}", config.logging.level.as_directive()),
    }
}

/// Load the config named on the command line, or the default one.
///
/// An explicit `--config` must load; the default location falls back to
/// built-in values.
fn load_config(args: &cli::Args) -> Result<(PagechatConfig, Option<ConfigError>), ConfigError> {
    let mut config = match args.config {
        Some(ref path) => (pagechat_config::load_config_from(Path::new(path))?, None),
        None => match pagechat_config::load_config() {
            Ok(config) => (config, None),
            Err(e) => (PagechatConfig::default(), Some(e)),
        },
    };
    if let Some(ref url) = args.backend_url {
        config.0.backend.base_url = url.clone();
        pagechat_config::validation::validate(&config.0)?;
    }
    Ok(config)
}

async fn run(args: cli::Args, config: PagechatConfig) -> Result<(), PagechatError> {
    let context = entry::launch(&args.mode, &config).await?;
    let mut view = TerminalView::new(std::io::stdout());
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    frontend::run(context, &mut view, input).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = load_config(&args);
    let directive = match loaded {
        Ok((ref config, _)) => log_directive(args.log_level.as_deref(), config),
        Err(_) => log_directive(args.log_level.as_deref(), &PagechatConfig::default()),
    };
    let filter = match directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse())
    {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    tracing::info!("Pagechat v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok((config, None)) => config,
        Ok((config, Some(e))) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            config
        }
        Err(e) => {
            tracing::error!("Config error: {e}");
            eprintln!("pagechat: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(backend = %config.backend.base_url, "Config loaded");
    tracing::debug!("Effective config: {}", pagechat_config::config_to_json(&config));

    match run(args, config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Fatal: {e}");
            eprintln!("pagechat: {e}");
            ExitCode::FAILURE
        }
    }
}
