use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod commands;

use commands::{
    run::{self, RunArgs},
    trace::{self, TraceArgs},
};

#[derive(Parser, Debug)]
#[command(name = "tagprobe", about = "Tag/probe leg resolution over generator event records")]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the tag/probe analysis over a JSON-lines event file.
    Run(RunArgs),
    /// Report how the ancestry walk between two particles of one event ends.
    Trace(TraceArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Trace(args) => trace::run(&args),
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
