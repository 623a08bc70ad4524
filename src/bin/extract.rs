//! Command-line interface for the routine extractor
//! Splits a concatenated Fortran source into one file per routine and writes the manifest.
//!
//! Usage:
//!   extract `<source-path>` [--config `<file>`] [--output-dir `<dir>`] [--manifest `<file>`]
//!   extract `<source-path>` --dry-run [--format json]   - Report units without writing files
//!
//! Settings come from the built-in defaults, then `./fsplit.toml` if present,
//! then `--config`, then the flags.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use fsplit::fsplit::extract::{
    ExtractError, ExtractOptions, ExtractionReport, Extractor, MemorySink, OutputLayout,
};
use fsplit_config::{FsplitConfig, Loader};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const PROJECT_CONFIG: &str = "fsplit.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] fsplit_config::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("cannot format report: {0}")]
    Format(#[from] serde_json::Error),
}

fn command() -> Command {
    Command::new("extract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split a multi-routine Fortran source into one file per routine")
        .arg(
            Arg::new("path")
                .help("Path to the concatenated source (e.g. decay0.for)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Extra TOML configuration layered over the defaults and ./fsplit.toml"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .help("Directory receiving the extracted units (default: src)"),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .short('m')
                .help("Manifest file listing extracted routines (default: routines.lis)"),
        )
        .arg(
            Arg::new("create-dirs")
                .long("create-dirs")
                .help("Create the output directory if it does not exist")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Copy declarators found inside an open unit instead of failing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Classify the source and report units without writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Summary format printed on stdout ('text' or 'json')")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only report warnings and errors")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = match command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    init_tracing(matches.get_flag("quiet"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; stdout only carries the summary.
fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let extractor = Extractor::new(ExtractOptions::from(&config));
    let layout = OutputLayout::from(&config.output);

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");

    let report = if matches.get_flag("dry-run") {
        let mut sink = MemorySink::new();
        extractor.extract_file(path, &mut sink)?
    } else {
        extractor.extract_to(path, &layout)?
    };

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    print!("{}", format_report(&report, format)?);
    Ok(())
}

/// Defaults, then the `--config` file, then individual flags.
fn load_config(matches: &ArgMatches) -> Result<FsplitConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        loader = loader.set_override("output.directory", dir.as_str())?;
    }
    if let Some(manifest) = matches.get_one::<String>("manifest") {
        loader = loader.set_override("output.manifest", manifest.as_str())?;
    }
    if matches.get_flag("create-dirs") {
        loader = loader.set_override("output.create_directory", true)?;
    }
    if matches.get_flag("lenient") {
        loader = loader.set_override("extraction.strict_nesting", false)?;
    }
    Ok(loader.build()?)
}

fn format_report(report: &ExtractionReport, format: &str) -> Result<String, CliError> {
    if format == "json" {
        let mut json = serde_json::to_string_pretty(report)?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    for unit in &report.units {
        out.push_str(&format!("{}\t{}\t{} lines\n", unit.filename, unit.category, unit.lines));
    }
    if let Some(filename) = &report.unterminated {
        out.push_str(&format!("{}\tunterminated\n", filename));
    }
    out.push_str(&format!(
        "{} units, {} routines in manifest\n",
        report.count(),
        report.manifest.len()
    ));
    Ok(out)
}
