//! Command dispatch: maps parsed arguments onto the services

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::commands::{
    AddUnits, CancelAdjustment, GetEnrollmentForm, GetEnrollmentProgram, GetGroupingContent,
    ModifyUnit, ModifyUnits, Reinitialize, RemoveUnits,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, ProgramArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{self, ToTree};
use crate::config::{self, Settings};
use crate::domain::{normalize_code, ElementRef};
use crate::infrastructure::ServiceContainer;

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given (see curov --help)".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        _ => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings)?;
            dispatch(&container, command)
        }
    }
}

/// Settings with the global `--catalog`/`--data-dir` flags applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local_dir = cli
        .config_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut settings = Settings::load(local_dir.as_deref())?;

    if let Some(catalog) = &cli.catalog {
        settings.catalog_file = Some(config::expand_path(catalog));
    }
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = config::expand_path(data_dir);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let default_year = container.settings.default_year;
    match command {
        Commands::Add {
            target,
            grouping,
            units,
            after_unit,
            after_grouping,
        } => {
            let insert_after = after_unit
                .as_deref()
                .map(|code| ElementRef::Unit(normalize_code(code)))
                .or_else(|| {
                    after_grouping
                        .as_deref()
                        .map(|code| ElementRef::Grouping(normalize_code(code)))
                });
            let cmd = AddUnits {
                year: resolve_year(target, default_year)?,
                program_code: target.program.clone(),
                add_to: grouping.clone(),
                units: units.clone(),
                insert_after,
            };
            cmd_add(container, &cmd)
        }
        Commands::Remove {
            target,
            grouping,
            units,
        } => {
            let cmd = RemoveUnits {
                year: resolve_year(target, default_year)?,
                program_code: target.program.clone(),
                remove_from: grouping.clone(),
                units: units.clone(),
            };
            cmd_remove(container, &cmd)
        }
        Commands::Modify {
            target,
            grouping,
            changes,
        } => {
            let year = resolve_year(target, default_year)?;
            let units = changes
                .iter()
                .map(|change| parse_change(change, year))
                .collect::<CliResult<Vec<_>>>()?;
            let cmd = ModifyUnits {
                year,
                program_code: target.program.clone(),
                adjust_in: grouping.clone(),
                units,
            };
            cmd_modify(container, &cmd)
        }
        Commands::Cancel {
            target,
            grouping,
            unit,
            kind,
        } => {
            let cmd = CancelAdjustment {
                year: resolve_year(target, default_year)?,
                program_code: target.program.clone(),
                grouping: grouping.clone(),
                unit: unit.clone(),
                kind: *kind,
            };
            cmd_cancel(container, &cmd)
        }
        Commands::Reinit { target } => {
            let cmd = Reinitialize {
                year: resolve_year(target, default_year)?,
                program_code: target.program.clone(),
            };
            cmd_reinit(container, &cmd)
        }
        Commands::Show { target, grouping } => {
            let year = resolve_year(target, default_year)?;
            match grouping {
                Some(grouping) => cmd_show_grouping(
                    container,
                    &GetGroupingContent {
                        year,
                        grouping_code: grouping.clone(),
                        program_code: target.program.clone(),
                    },
                ),
                None => cmd_show(
                    container,
                    &GetEnrollmentForm {
                        year,
                        program_code: target.program.clone(),
                    },
                ),
            }
        }
        Commands::Program { target } => {
            let query = GetEnrollmentProgram {
                year: resolve_year(target, default_year)?,
                program_code: target.program.clone(),
            };
            cmd_program(container, &query)
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_year(target: &ProgramArgs, default_year: Option<i32>) -> CliResult<i32> {
    target.year.or(default_year).ok_or_else(|| {
        CliError::InvalidArgs("no year given (use --year or set default_year)".to_string())
    })
}

/// Parse `UNIT=BLOCK`.
fn parse_change(change: &str, year: i32) -> CliResult<ModifyUnit> {
    let (code, block) = change
        .split_once('=')
        .ok_or_else(|| CliError::InvalidArgs(format!("expected UNIT=BLOCK, got '{change}'")))?;
    let block = block
        .trim()
        .parse::<u8>()
        .map_err(|e| CliError::InvalidArgs(format!("invalid block in '{change}': {e}")))?;
    Ok(ModifyUnit {
        code: normalize_code(code),
        year,
        block,
    })
}

#[instrument(level = "debug", skip(container))]
fn cmd_add(container: &ServiceContainer, cmd: &AddUnits) -> CliResult<()> {
    let id = container.adjustment_service().add_units(cmd)?;
    output::action(
        "Added",
        &format!(
            "{} unit(s) to {} in {}",
            cmd.units.len(),
            cmd.grouping(),
            cmd.program()
        ),
    );
    output::detail(&format!("adjustment {id}"));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_remove(container: &ServiceContainer, cmd: &RemoveUnits) -> CliResult<()> {
    let id = container.adjustment_service().remove_units(cmd)?;
    output::action(
        "Removed",
        &format!(
            "{} unit(s) from {} in {}",
            cmd.units.len(),
            cmd.grouping(),
            cmd.program()
        ),
    );
    output::detail(&format!("adjustment {id}"));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_modify(container: &ServiceContainer, cmd: &ModifyUnits) -> CliResult<()> {
    container.adjustment_service().modify_units(cmd)?;
    for unit in &cmd.units {
        output::success(&format!("{} -> bloc {}", unit.identity(), unit.block));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_cancel(container: &ServiceContainer, cmd: &CancelAdjustment) -> CliResult<()> {
    match container.adjustment_service().cancel_adjustment(cmd)? {
        Some(_) => output::success(&format!(
            "cancelled {} adjustment of {} in {}",
            cmd.kind,
            cmd.unit(),
            cmd.grouping()
        )),
        None => output::warning(&format!(
            "no {} adjustment of {} in {}",
            cmd.kind,
            cmd.unit(),
            cmd.grouping()
        )),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_reinit(container: &ServiceContainer, cmd: &Reinitialize) -> CliResult<()> {
    let count = container.adjustment_service().reinitialize(cmd)?;
    output::action(
        "Reinitialized",
        &format!("{}: {} grouping(s) back to catalog content", cmd.program(), count),
    );
    Ok(())
}

fn cmd_show(container: &ServiceContainer, query: &GetEnrollmentForm) -> CliResult<()> {
    let view = container.content_service().enrollment_form(query)?;
    output::header(&format!("{} {}", view.program, view.full_title));
    output::info(&view.root.to_tree());
    Ok(())
}

fn cmd_show_grouping(container: &ServiceContainer, query: &GetGroupingContent) -> CliResult<()> {
    let view = container.content_service().grouping_content(query)?;
    output::header(&format!("{} {}", view.code, view.full_title));
    if view.elements.is_empty() {
        output::detail(&"(empty)");
    }
    for element in &view.elements {
        output::content_row(element);
    }
    Ok(())
}

fn cmd_program(container: &ServiceContainer, query: &GetEnrollmentProgram) -> CliResult<()> {
    let view = container.content_service().enrollment_program(query)?;
    output::header(&format!("{} ({}) {}", view.code, view.year, view.full_title));
    for grouping in &view.subprogram {
        output::info(&grouping.to_tree());
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let settings = load_settings(cli)?;
    match command {
        ConfigCommands::Show => {
            let toml = settings.to_toml()?;
            output::info(&toml);
        }
        ConfigCommands::Path => {
            let global = config::global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            let local_dir = cli
                .config_dir
                .clone()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."));
            output::action("global", &global);
            output::action("local", &config::local_config_path(&local_dir).display());
            output::action("store", &settings.store_path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unit_block_pair_when_parse_change_then_normalized_modify_unit() {
        let unit = parse_change(" lsinf1311 =2", 2021).expect("valid change");
        assert_eq!(
            unit,
            ModifyUnit {
                code: "LSINF1311".to_string(),
                year: 2021,
                block: 2,
            }
        );
    }

    #[test]
    fn given_missing_separator_when_parse_change_then_invalid_args() {
        let err = parse_change("LSINF1311", 2021).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn given_no_year_anywhere_when_resolve_year_then_invalid_args() {
        let target = ProgramArgs {
            program: "LECGE100B".to_string(),
            year: None,
        };
        assert!(resolve_year(&target, None).is_err());
        assert_eq!(resolve_year(&target, Some(2021)).ok(), Some(2021));
    }
}
