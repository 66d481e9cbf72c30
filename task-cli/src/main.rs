use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use task_cli::{JsonTaskRepository, Settings, TaskService, logging};

/// Track short text tasks in a local file.
///
/// Commands: add, list [todo|in-progress|done], update, delete,
/// mark-in-progress, mark-done.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Task file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Command followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.args.first() else {
        return Ok(());
    };

    let settings = Settings::load(cli.file.as_deref()).context("cannot load settings")?;
    let _log4rs_handle = logging::init(&settings.log.level)?;
    info!("Using task file {}", settings.storage.path.display());

    let repository = JsonTaskRepository::new(&settings.storage.path).with_context(|| {
        format!("cannot open task file {}", settings.storage.path.display())
    })?;
    let mut service = TaskService::new(repository, std::io::stdout().lock());
    service.execute(command, &cli.args)?;

    Ok(())
}
