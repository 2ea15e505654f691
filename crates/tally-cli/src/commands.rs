use std::io::{self, Stdout};
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use tally_app::{CalculationLog, EntryId, FileStore, Operator, Orchestrator, TallyConfig};

use crate::cli::*;
use crate::console::ConsolePresentation;

type App = Orchestrator<FileStore, ConsolePresentation<Stdout>>;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = TallyConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(enabled) = color_override(config.color) {
        colored::control::set_override(enabled);
    }

    if let Command::Config = cli.command {
        print!("{}", toml::to_string(&config).context("rendering config")?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut app = open_app(&config, cli.format)?;
    app.start();

    match cli.command {
        Command::Calc(args) => cmd_calc(&mut app, args),
        Command::History(args) => cmd_history(&mut app, args),
        Command::Load(args) => cmd_load(&mut app, args),
        Command::Delete(args) => cmd_delete(&mut app, args),
        Command::Clear => cmd_clear(&mut app),
        Command::Config => Ok(ExitCode::SUCCESS),
    }
}

fn open_app(config: &TallyConfig, format: OutputFormat) -> anyhow::Result<App> {
    let store = config
        .open_store()
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let log = CalculationLog::new(store, config.storage_key.clone());
    Ok(Orchestrator::new(log, ConsolePresentation::new(io::stdout(), format)))
}

/// `color = true` leaves terminal detection to `colored`; only `false` is
/// forced.
fn color_override(color: bool) -> Option<bool> {
    (!color).then_some(false)
}

/// Aliases are resolved here; anything unrecognised is passed through as a
/// raw token so the dispatcher reports it.
fn resolve_token(op: &str) -> String {
    op.parse::<Operator>()
        .map(|operator| operator.token().to_string())
        .unwrap_or_else(|_| op.to_string())
}

fn cmd_calc(app: &mut App, args: CalcArgs) -> anyhow::Result<ExitCode> {
    let token = resolve_token(&args.op);
    match app.calculate(&args.a, &args.b, &token) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn cmd_history(app: &mut App, args: HistoryArgs) -> anyhow::Result<ExitCode> {
    let presentation = app.presentation_mut();
    presentation.print_history(args.limit)?;
    let hidden = presentation.view().len().saturating_sub(args.limit);
    if hidden > 0 && presentation.format() == OutputFormat::Text {
        println!("{}", format!("... {hidden} older").dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_load(app: &mut App, args: EntryArgs) -> anyhow::Result<ExitCode> {
    let id = EntryId::new(args.id);
    match app.load(id) {
        Some(Ok(_)) => Ok(ExitCode::SUCCESS),
        Some(Err(_)) => Ok(ExitCode::FAILURE),
        None => anyhow::bail!("no history entry {id}"),
    }
}

fn cmd_delete(app: &mut App, args: EntryArgs) -> anyhow::Result<ExitCode> {
    let id = EntryId::new(args.id);
    if app.delete(id) {
        app.presentation_mut().message(&format!("Deleted {id}"))?;
        Ok(ExitCode::SUCCESS)
    } else {
        anyhow::bail!("no history entry {id}")
    }
}

fn cmd_clear(app: &mut App) -> anyhow::Result<ExitCode> {
    let dropped = app.log().len();
    app.clear_all();
    app.presentation_mut()
        .message(&format!("History cleared ({dropped} entries)"))?;
    Ok(ExitCode::SUCCESS)
}
