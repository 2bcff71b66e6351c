//! Command-line interface for split-sheet.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **generate**: Assemble a split sheet interactively and save it
//! - **search**: Look up a writer in the roster without starting a session
//! - **inspect**: Show the styles, paragraphs and tables of a `.docx` file
//!
//! ## Usage
//!
//! ```text
//! # Generate a split sheet from a configuration file
//! split-sheet generate --config split_sheet_config.csv
//!
//! # Skip the song prompts
//! split-sheet generate --config config.csv --song "Midnight Drive" --artist "The Band" --no-date
//!
//! # Check who "jane" would match, as JSON
//! split-sheet search jane --roster roster.csv --format json
//!
//! # See which styles a template defines
//! split-sheet inspect template.docx
//! ```

use clap::{Parser, Subcommand};

pub mod generate;
pub mod inspect;
pub mod search;

#[derive(Parser)]
#[command(name = "split-sheet")]
#[command(version)]
#[command(about = "Generate versioned music split sheets from a template and a writer roster")]
#[command(
    long_about = "split-sheet assembles a split sheet document recording ownership shares of a song.\n\nIt merges a template's styles, a body text with SONG TITLE / ARTIST NAME placeholders, and contributors picked from a roster by fuzzy name search:\n- A title and optional date line\n- A contributor table with IPI numbers and PROs\n- Signature blocks, three per line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble a split sheet interactively
    Generate(generate::GenerateArgs),

    /// Search the roster for a writer name
    Search(search::SearchArgs),

    /// Show the contents of a .docx document
    Inspect(inspect::InspectArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
