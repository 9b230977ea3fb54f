//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ForestService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{CyclePolicy, Forest, InputRecord, SiblingOrder, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Tree { file } => _tree(cli, file.as_deref()),
        Commands::Labels { file, ids } => _labels(cli, file.as_deref(), *ids),
        Commands::Search { pattern, file } => _search(cli, pattern, file.as_deref()),
        Commands::Leaves { file } => _leaves(cli, file.as_deref()),
        Commands::Config { command } => _config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Loaded settings with command-line flags applied on top.
fn settings_for(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    for (flag, value, target) in [
        ("--id-field", &cli.id_field, &mut settings.fields.id),
        ("--parent-field", &cli.parent_field, &mut settings.fields.parent),
        ("--title-field", &cli.title_field, &mut settings.fields.title),
    ] {
        if let Some(v) = value {
            if v.is_empty() {
                return Err(CliError::InvalidArgs(format!("{} must not be empty", flag)));
            }
            *target = v.clone();
        }
    }
    if let Some(sep) = &cli.separator {
        settings.separator = sep.clone();
    }
    if cli.by_title {
        settings.sibling_order = SiblingOrder::Title;
    }
    if cli.strict {
        settings.cycle_policy = CyclePolicy::Reject;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn load_forest(service: &ForestService, file: Option<&Path>) -> CliResult<Forest<InputRecord>> {
    let records = match file {
        Some(path) => service.load_path(path)?,
        None => service.load_reader(io::stdin().lock())?,
    };
    Ok(service.build(records)?)
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let service = ForestService::new(settings_for(cli)?);
    let forest = load_forest(&service, file)?;
    debug!("Found {} trees", forest.roots().len());
    for tree in forest.to_tree_strings() {
        output::info(&tree);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _labels(cli: &Cli, file: Option<&Path>, ids: bool) -> CliResult<()> {
    let service = ForestService::new(settings_for(cli)?);
    let forest = load_forest(&service, file)?;
    for node in service.labels(&forest) {
        if ids {
            output::labeled(&node.record.id, &node.label);
        } else {
            output::info(&node.label);
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _search(cli: &Cli, pattern: &str, file: Option<&Path>) -> CliResult<()> {
    let service = ForestService::new(settings_for(cli)?);
    let forest = load_forest(&service, file)?;
    let labeled = service.labels(&forest);
    let matches = service.search(&labeled, pattern);
    if matches.is_empty() {
        output::warning(&format!("no titles match '{}'", pattern));
    }
    for node in matches {
        output::labeled(&node.record.id, &node.label);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _leaves(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let service = ForestService::new(settings_for(cli)?);
    let forest = load_forest(&service, file)?;
    let labeler = service.labeler();
    for leaf in forest.leaf_nodes() {
        output::info(&labeler.label(&forest, leaf));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = settings_for(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(p) => output::info(&format!("global: {}", p.display())),
                None => output::info("global: (no config directory)"),
            }
            if let Some(local) = &cli.config {
                output::info(&format!("local:  {}", local.display()));
            }
        }
    }
    Ok(())
}
