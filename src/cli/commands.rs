//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, site_config_path, Settings};
use crate::domain::{GenusStyles, FALLBACK_STYLE};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build {
            output,
            sheet,
            no_photos,
        }) => cmd_build(cli, output.as_deref(), sheet.as_deref(), *no_photos),
        Some(Commands::Inspect) => cmd_inspect(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given (try `arbormap build` or `arbormap --help`)".into(),
        )),
    }
}

/// Site directory from `-C`, else the current directory.
fn resolve_site_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.site_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::CurrentDir(e).into()),
    }
}

#[instrument(skip(cli))]
fn cmd_build(
    cli: &Cli,
    output: Option<&Path>,
    sheet: Option<&str>,
    no_photos: bool,
) -> CliResult<()> {
    let site_dir = resolve_site_dir(cli)?;
    let mut settings = Settings::load(Some(&site_dir))?;
    if let Some(sheet) = sheet {
        if sheet.trim().is_empty() {
            return Err(CliError::InvalidArgs("--sheet must not be empty".into()));
        }
        settings.inventory_sheet = sheet.to_string();
    }
    if let Some(out) = output {
        if out.is_dir() {
            return Err(CliError::InvalidArgs(format!(
                "--output must be a file, {} is a directory",
                out.display()
            )));
        }
    }

    let container = ServiceContainer::new(settings);
    let mut inputs = container.locator().locate(&site_dir)?;
    if let Some(out) = output {
        inputs.output = out.to_path_buf();
    }
    if no_photos {
        inputs.photos = None;
    }
    debug!("cmd_build: {:?}", inputs);

    let report = container.map_service().render_site(&inputs)?;

    output::done(&format!("Map created for: {}", report.site_name));
    output::field(
        "Output",
        &report
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.output.display().to_string()),
    );
    output::field(
        "Trees",
        &format!(
            "{} ({} genera, {} canopy circles)",
            report.trees, report.genera, report.canopies
        ),
    );
    if inputs.photos.is_some() {
        output::field(
            "Photos",
            &format!(
                "{} embedded, {} trees without photo",
                report.photos_embedded, report.photos_missing
            ),
        );
    }
    if report.dropped_rows > 0 {
        output::warning(&format!(
            "{} row(s) skipped for missing coordinates",
            report.dropped_rows
        ));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_inspect(cli: &Cli) -> CliResult<()> {
    let site_dir = resolve_site_dir(cli)?;
    let container = ServiceContainer::new(Settings::load(Some(&site_dir))?);

    let inputs = container.locator().locate(&site_dir)?;
    let inventory = container
        .inventory_service()
        .load(&inputs.inventory, &container.settings.inventory_sheet)?;

    output::site_heading(&inputs.site_name);
    output::field("Inventory", &inputs.inventory.display());
    output::field("Boundary", &inputs.boundary.display());
    match &inputs.photos {
        Some(dir) => output::field("Photos", &dir.display()),
        None => output::field("Photos", "(none)"),
    }
    output::field("Output", &inputs.output.display());
    output::field(
        "Trees",
        &format!(
            "{} ({} rows without coordinates)",
            inventory.len(),
            inventory.dropped_rows
        ),
    );
    if let Some(center) = inventory.center() {
        output::field("Center", &center);
    }

    let styles = GenusStyles::assign(inventory.genera());
    let mut legend = Tree::new(format!("genera ({})", styles.len()));
    for entry in styles.legend() {
        legend.push(format!(
            "{}: {} {}",
            entry.genus, entry.style.color, entry.style.shape
        ));
    }
    let untyped = inventory.records.iter().filter(|r| r.genus.is_none()).count();
    if untyped > 0 {
        legend.push(format!(
            "(no genus, {untyped} trees): {} {}",
            FALLBACK_STYLE.color, FALLBACK_STYLE.shape
        ));
    }
    output::raw(&legend);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let site_dir = resolve_site_dir(cli)?;
            let settings = Settings::load(Some(&site_dir))?;
            output::raw(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let site_dir = resolve_site_dir(cli)?;
            match global_config_path() {
                Some(path) => output::field("Global", &config_location(&path)),
                None => output::field("Global", "(no config directory)"),
            }
            output::field("Site", &config_location(&site_config_path(&site_dir)));
        }
        ConfigCommands::Template => output::raw(&Settings::template()),
    }
    Ok(())
}

fn config_location(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
