use anyhow::Result;
use clap::Parser;
use revlink::app::AppState;
use revlink::cli::{Cli, Commands};
use revlink::config::Config;
use revlink::editor::LineBuffer;
use revlink::helper::{SubprocessHelper, check_command_exists};
use revlink::keybindings::KeybindingCache;
use revlink::resolver::HandlerRegistry;
use revlink::ui;
use revlink::ui::theme::Theme;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Review { url }) => handle_review(&config, &url),
        Some(Commands::Edit { file }) => handle_edit(config, file),
        None => handle_edit(config, None),
    }
}

/// The helper side of the contract: print the review string and exit 0,
/// or print a human-readable message and exit 1. The caller captures
/// this output either way.
fn handle_review(config: &Config, url: &str) -> Result<()> {
    let registry = HandlerRegistry::from_config(&config.services)?;
    match registry.review(url) {
        Ok(review) => {
            println!("{review}");
            Ok(())
        }
        Err(err) => {
            println!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn handle_edit(config: Config, file: Option<PathBuf>) -> Result<()> {
    let buffer = match &file {
        Some(path) if path.exists() => LineBuffer::load(path)?,
        _ => LineBuffer::new(),
    };

    let helper = SubprocessHelper::new(config.helper_command.clone());
    let theme = Theme::from_config(&config);
    let keybindings = KeybindingCache::from_config(&config.keybindings);
    let message_timeout = Duration::from_millis(config.message_timeout);

    let mut state = AppState::new(buffer, file, helper, theme, keybindings, message_timeout);

    if let Err(reason) = check_command_exists(&config.helper_command) {
        state.set_status_message(format!("Warning: {reason}"));
    }

    ui::run_tui(state)
}
