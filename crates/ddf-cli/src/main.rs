//! Command-line tool for inspecting and re-formatting DDF files.
//!
//! Usage:
//!   ddf show <file>
//!   ddf names <file> [--types] [--merge]
//!   ddf check <file>
//!   ddf fmt <file> [--flags <letters>] [--output <path>]
//!
//! Set `RUST_LOG` (default `warn`) to control diagnostics on stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use ddf::{Document, DocumentError, NameListing, ParseOptions, RenderOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "ddf", version, about = "Inspect and re-format DDF files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a summary table of all variables
    Show(Input),
    /// List variable names
    Names {
        #[command(flatten)]
        input: Input,
        /// Append each variable's type symbol
        #[arg(long)]
        types: bool,
        /// Print all names on one comma-separated line
        #[arg(long)]
        merge: bool,
    },
    /// Load a file and report whether it is valid
    Check(Input),
    /// Re-render a file
    Fmt {
        #[command(flatten)]
        input: Input,
        /// Render flags: v vertical, o optimize, d decapitate, - skip
        /// version, ; terminate, s sort matrices, u hide descriptions
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        flags: String,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Input {
    /// DDF file to read
    file: PathBuf,
    /// Accept names under the legacy naming rule
    #[arg(long)]
    legacy: bool,
}

impl Input {
    fn open(&self) -> Result<Document, DocumentError> {
        let options = if self.legacy {
            ParseOptions::legacy()
        } else {
            ParseOptions::new()
        };
        let mut doc = Document::new();
        doc.load_with(&self.file, &options)?;
        Ok(doc)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), DocumentError> {
    match command {
        Command::Show(input) => {
            let doc = input.open()?;
            print!("{}", doc.show());
        }
        Command::Names { input, types, merge } => {
            let doc = input.open()?;
            let listing = NameListing {
                with_types: types,
                merged: merge,
            };
            for name in doc.names(listing) {
                println!("{name}");
            }
        }
        Command::Check(input) => {
            let doc = input.open()?;
            println!("ok: {} variables", doc.count());
        }
        Command::Fmt { input, flags, output } => {
            let mut doc = input.open()?;
            let options = RenderOptions::from_flags(&flags);
            match output {
                Some(path) => save(&mut doc, &path, &options)?,
                None => print!("{}", doc.render(&options)?),
            }
        }
    }
    Ok(())
}

fn save(doc: &mut Document, path: &Path, options: &RenderOptions) -> Result<(), DocumentError> {
    doc.save(path, options)?;
    debug!(path = %path.display(), "formatted file written");
    Ok(())
}
