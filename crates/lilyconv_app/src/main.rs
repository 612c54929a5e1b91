mod commands;
mod effects;
mod persistence;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lilyconv_logging::{initialize, LogDestination};
use log::LevelFilter;

use commands::convert::ConvertArgs;
use commands::import::ImportArgs;
use commands::RunStatus;
use effects::EffectRunner;
use persistence::{default_settings_path, SettingsFile};

#[derive(Parser)]
#[command(name = "lilyconv")]
#[command(about = "Update LilyPond documents with convert-ly and import MusicXML with musicxml2ly")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, global = true, value_name = "PATH", help = "Settings file to use instead of the default")]
    settings: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Also write the log to this file")]
    log_file: Option<PathBuf>,
    #[arg(long, short, global = true, help = "Log debug output")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run convert-ly on a document and show what changed")]
    Convert(ConvertArgs),
    #[command(about = "Import a MusicXML file with musicxml2ly")]
    Import(ImportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    initialize(destination, level);

    match run(cli) {
        Ok(status) => status.exit_code(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<RunStatus> {
    let settings_path = match cli.settings {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let mut settings = SettingsFile::load(settings_path);
    let runner = EffectRunner::new();

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, &mut settings, &runner),
        Commands::Import(args) => commands::import::run(args, &mut settings, &runner),
    }
}
