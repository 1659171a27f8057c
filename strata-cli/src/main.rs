//! Strata CLI - Command line interface
//!
//! Project-based batch compilation: sources, sourcepath and compiler flags come
//! from a JSON manifest (`strata.json`), command line flags override the flags.

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

mod config;
mod logging;
mod report;

use crate::config::{library_logger, parse_phase, read_manifest, resolve_entry, LogConfig};
use crate::logging::LogFormat;
use strata_api::{compile_batch, expand_sources, LogLevel, NativeFileSystem, RunConfig};
use strata_config::Phase;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "strata", about = "Strata batch compiler - project-based compilation", version)]
struct Cli {
    /// Manifest file path
    #[arg(value_name = "MANIFEST", default_value = "strata.json")]
    manifest: PathBuf,

    /// Drop units with syntax errors instead of compiling them
    #[arg(long)]
    tolerant: bool,

    /// Diagnostic level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Trace one phase regardless of the global level (parser, binder, fault_in, ...)
    #[arg(long, value_name = "PHASE", value_parser = parse_phase)]
    trace_phase: Vec<Phase>,

    /// Also append compiler log records to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log and report format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    format: LogFormat,
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level '{s}'"))
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
    }
}

/// Compile the project; `Ok(false)` when any unit has errors
fn run(cli: &Cli) -> Result<bool, String> {
    let manifest = read_manifest(&cli.manifest).map_err(|e| e.to_string())?;

    let mut compiler = manifest.compiler_config();
    if cli.tolerant {
        compiler.tolerant = true;
    }
    if let Some(level) = cli.log_level {
        compiler.diagnostic_level = level;
    }

    let log_config = cli
        .trace_phase
        .iter()
        .fold(LogConfig::new(compiler.diagnostic_level), |config, phase| {
            config.with_phase(*phase, LevelFilter::TRACE)
        });
    logging::init(&log_config, cli.format);
    tracing::debug!(target: "strata::cli", manifest = %cli.manifest.display(), "manifest loaded");

    // Records below the most verbose target's level are dropped before formatting.
    let logger = library_logger(log_config.max_level(), cli.log_file.as_deref());

    let vfs = Arc::new(NativeFileSystem::new());
    let entries: Vec<PathBuf> = manifest
        .sources
        .iter()
        .map(|entry| resolve_entry(&cli.manifest, entry))
        .collect();
    let files = expand_sources(vfs.as_ref(), &entries).map_err(|e| e.to_string())?;

    let run_config = RunConfig::new(compiler)
        .with_sourcepath(manifest.sourcepath.iter().map(|root| resolve_entry(&cli.manifest, root)))
        .with_logger(logger);

    let output = compile_batch(vfs, &files, &run_config).map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    report::write_report(&mut stdout.lock(), &output, cli.format == LogFormat::Json).map_err(|e| e.to_string())?;
    Ok(!output.has_errors())
}
