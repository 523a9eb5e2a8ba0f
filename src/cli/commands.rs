//! Command dispatch: builds the session tree, runs one command, prints the result.

use std::io::{self, BufRead};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{TaxonMatch, TaxonomyService};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, DisplayStyle, Settings};
use crate::domain::{InsertOutcome, TraversalOrder};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `taxotree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => cmd_completion(*shell),
        Commands::Config { command } => cmd_config(cli, command),
        _ => {
            let settings = load_settings(cli)?;
            let mut service = TaxonomyService::from_settings(&settings)?;
            let result = run_session_command(command, &settings, &mut service);
            let released = service.close();
            debug!("session closed, released {} nodes", released);
            result
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_seed {
        settings.seed_examples = false;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn run_session_command(
    command: &Commands,
    settings: &Settings,
    service: &mut TaxonomyService,
) -> CliResult<()> {
    match command {
        Commands::Tree { style } => {
            cmd_tree(service, settings, style.unwrap_or(settings.display.style))
        }
        Commands::Search { query } => cmd_search(service, query),
        Commands::Traverse { order } => cmd_traverse(service, *order),
        Commands::Add { path, common, link } => cmd_add(service, settings, path, common, link),
        Commands::Update {
            query,
            common,
            link,
        } => cmd_update(service, query, common, link),
        Commands::Delete { query, yes } => cmd_delete(service, settings, query, *yes),
        Commands::Info => cmd_info(service),
        Commands::Completion { .. } | Commands::Config { .. } => Err(CliError::InvalidArgs(
            "command does not operate on a taxonomy session".to_string(),
        )),
    }
}

fn cmd_tree(service: &TaxonomyService, settings: &Settings, style: DisplayStyle) -> CliResult<()> {
    if service.tree().is_empty() {
        output::warning("taxonomy tree is empty");
        return Ok(());
    }
    output::header("Taxonomy tree");
    output::info(service.render(style, settings.display.options()).trim_end());
    Ok(())
}

#[instrument(skip(service))]
fn cmd_search(service: &TaxonomyService, query: &str) -> CliResult<()> {
    let found = service.find(query)?;
    output::success(&format!("'{}' found", query));
    print_match(&found);
    Ok(())
}

fn print_match(found: &TaxonMatch) {
    output::action("Name", &found.name);
    output::action("Level", &found.level);
    output::action("Lineage", &found.lineage_display());
    if found.level.is_species() {
        output::action("Common name", &found.common_name);
        output::action("Reference", found.reference_link().unwrap_or("-"));
    }
    output::action("Children", &found.children);
}

fn cmd_traverse(service: &TaxonomyService, order: TraversalOrder) -> CliResult<()> {
    output::header(&format!("{order}-order traversal"));
    for node in service.traverse(order)? {
        output::detail(&format!("({}) {}", node.level, node.name));
    }
    Ok(())
}

#[instrument(skip(service, settings))]
fn cmd_add(
    service: &mut TaxonomyService,
    settings: &Settings,
    path: &[String],
    common: &str,
    link: &str,
) -> CliResult<()> {
    let outcome = service.add_species(path, common, link)?;
    let species = service
        .tree()
        .get(outcome.species())
        .map(|node| node.name().to_string())
        .unwrap_or_default();
    match outcome {
        InsertOutcome::Created { new_nodes, .. } => output::success(&format!(
            "added new species: {} ({}), {} new node(s)",
            common, species, new_nodes
        )),
        InsertOutcome::Updated { .. } => output::success(&format!(
            "species '{}' already exists, updated common name to '{}'",
            species, common
        )),
        InsertOutcome::Unchanged { .. } => output::warning(&format!(
            "species '{}' already exists with the same details",
            species
        )),
    }
    cmd_tree(service, settings, settings.display.style)
}

#[instrument(skip(service))]
fn cmd_update(service: &mut TaxonomyService, query: &str, common: &str, link: &str) -> CliResult<()> {
    let updated = service.update_species(query, common, link)?;
    output::success(&format!("updated species '{}'", updated.name));
    print_match(&updated);
    Ok(())
}

#[instrument(skip(service, settings))]
fn cmd_delete(
    service: &mut TaxonomyService,
    settings: &Settings,
    query: &str,
    yes: bool,
) -> CliResult<()> {
    let target = service.find(query)?;
    if target.level.is_species() && !yes {
        output::prompt(&format!(
            "Delete species '{} ({})'? (y/n):",
            target.common_name, target.name
        ));
        if !confirm(io::stdin().lock())? {
            output::info("Aborted.");
            return Ok(());
        }
    }
    let removed = service.delete_species(query)?;
    output::success(&format!("deleted species '{}'", removed.name()));
    cmd_tree(service, settings, settings.display.style)
}

/// Reads one line and accepts `y`/`yes` in any case.
fn confirm(mut input: impl BufRead) -> CliResult<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn cmd_info(service: &TaxonomyService) -> CliResult<()> {
    let tree = service.tree();
    output::header("taxotree");
    output::action("Nodes", &tree.len());
    output::action("Species", &tree.species_count());
    output::action("Depth", &tree.depth());
    if let Some(path) = global_config_path() {
        output::action("Global config", &path.display());
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no config directory available on this platform"),
            }
            if let Some(path) = &cli.config {
                output::action("File", &path.display());
            }
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("no config directory available on this platform".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&path, Settings::template())?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", true)]
    #[case("YES\n", true)]
    #[case("n\n", false)]
    #[case("", false)]
    fn given_answer_when_confirming_then_accepts_only_yes(
        #[case] answer: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(confirm(answer.as_bytes()).unwrap(), expected);
    }

    #[test]
    fn given_no_command_when_executing_then_usage_error() {
        let cli = Cli {
            debug: 0,
            config: None,
            no_seed: false,
            command: None,
        };
        assert!(matches!(execute_command(&cli), Err(CliError::Usage(_))));
    }
}
