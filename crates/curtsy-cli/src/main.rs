//! Curtsy CLI - annotated-source documentation from the command line
//!
//! Parses source files into documentation sections and a cross-file type
//! registry, and prints the result for a renderer to consume.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use curtsy_core::doc::{FileError, ProjectDoc, SourceUnit, TypeLink};
use serde::Serialize;
use tracing::Level;

mod input;

use input::{Input, InputArgs};

#[derive(Parser)]
#[command(name = "curtsy")]
#[command(version = curtsy_core::VERSION)]
#[command(about = "Readable, hyperlinked documentation from annotated source", long_about = None)]
struct Cli {
    /// Increase log output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sections of each source file as JSON
    Sections {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the types declared across the source files
    Types {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("failed to determine the current directory")?;

    match cli.command {
        Commands::Sections { input, pretty } => {
            let (doc, failures) = run(&input.resolve(&cwd)?)?;
            let units: Vec<UnitView<'_>> = doc
                .units
                .iter()
                .map(|unit| UnitView {
                    output: unit.output_path(),
                    links: doc.links_from(&unit.name),
                    unit,
                })
                .collect();
            let json = if pretty {
                serde_json::to_string_pretty(&units)?
            } else {
                serde_json::to_string(&units)?
            };
            println!("{json}");
            report(&failures)?;
        }

        Commands::Types { input, json } => {
            let (doc, failures) = run(&input.resolve(&cwd)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&doc.types)?);
            } else {
                print_type_table(&doc);
            }
            report(&failures)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parse the project, strictly or leniently
fn run(input: &Input) -> Result<(ProjectDoc, Vec<FileError>)> {
    if input.keep_going {
        Ok(input.project.parse_lenient())
    } else {
        let doc = input.project.parse().context("failed to parse sources")?;
        Ok((doc, Vec::new()))
    }
}

/// Print every failure of a lenient run and fail if there were any
fn report(failures: &[FileError]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    for failure in failures {
        eprintln!("error: {failure}");
    }
    anyhow::bail!("{} file(s) could not be parsed", failures.len())
}

/// A unit as printed by `curtsy sections`
#[derive(Serialize)]
struct UnitView<'a> {
    #[serde(flatten)]
    unit: &'a SourceUnit,
    /// Document path of the unit
    output: String,
    /// Types declared elsewhere, linked from this unit's document
    links: Vec<TypeLink>,
}

fn print_type_table(doc: &ProjectDoc) {
    if doc.types.is_empty() {
        println!("No types found.");
        return;
    }

    let name_width = doc.types.iter().map(|d| d.name.len()).max().unwrap_or(0).max(4);
    let file_width = doc.types.iter().map(|d| d.file.len()).max().unwrap_or(0).max(4);

    println!("{:<name_width$}  {:<9}  {:<file_width$}  LINE", "NAME", "KIND", "FILE");
    for decl in &doc.types {
        println!(
            "{:<name_width$}  {:<9}  {:<file_width$}  {}",
            decl.name,
            decl.kind.keyword(),
            decl.file,
            decl.line
        );
    }
}
