//! Command dispatch

use std::io;
use std::path::Path;

use chrono::Utc;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::render_outline;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeDisplay;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file, format }) => cmd_show(container, file, *format),
        Some(Commands::Stats { file }) => cmd_stats(container, file),
        Some(Commands::Expired { file }) => cmd_expired(container, file),
        Some(Commands::Init { file, name }) => cmd_init(container, file, name),
        Some(Commands::Config { command }) => cmd_config(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `kdbtree --help`".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path, format: OutputFormat) -> CliResult<()> {
    let tree = container.outline.load(file)?;
    match format {
        OutputFormat::Tree => {
            let show_entries = container.settings.display.show_entries;
            output::info(&tree.to_tree_string(show_entries));
        }
        OutputFormat::Toml => output::info(&render_outline(&tree)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = container.outline.load(file)?;
    let stats = container.outline.stats(&tree, Utc::now());
    debug!("stats: {:?}", stats);

    output::header(&file.display());
    output::field("groups", &stats.groups);
    output::field("entries", &stats.entries);
    output::field("depth", &stats.depth);
    output::field("expired", &stats.expired);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_expired(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = container.outline.load(file)?;
    let expired = container.outline.expired_with_paths(&tree, Utc::now());
    if expired.is_empty() {
        output::success("no expired entries");
        return Ok(());
    }

    output::header(&format!("{} expired entries", expired.len()));
    for (id, path) in expired {
        if let Some(entry) = tree.entry(id) {
            let expiry = entry
                .times
                .expiry
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            output::detail(&format!("{}/{} (expired {})", path, entry.title, expiry));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_init(container: &ServiceContainer, file: &Path, name: &str) -> CliResult<()> {
    container.outline.init(file, name)?;
    output::success(&format!("created {}", file.display()));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                output::info(&path.display());
                if !path.exists() {
                    output::warning("global config file does not exist yet");
                }
            }
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}
