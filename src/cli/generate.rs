use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::assembly::assembler::{AssemblyRequest, DocumentAssembler};
use crate::assembly::output;
use crate::assembly::table::append_contributor_table;
use crate::cli::OutputFormat;
use crate::config::{ConfigOverrides, SplitSheetConfig};
use crate::core::contributor::AcceptedContributors;
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::roster::store::RosterTable;
use crate::session::prompt::{
    run_session, ConsolePrompter, Prompter, ARTIST_PROMPT, DATE_PROMPT, SONG_PROMPT,
};
use crate::session::Session;
use crate::utils::validation::parse_threshold;

/// Answer to the date prompt that adds the date line
const ADD_DATE_ANSWER: &str = "1";

#[derive(Args)]
pub struct GenerateArgs {
    /// Key/value configuration file (CSV, or TSV by extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Template document whose paragraph styles are copied
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Document holding the body text
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Contributor roster (CSV or TSV)
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Directory the split sheet is saved in (must exist)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Company name used as the document title
    #[arg(long)]
    pub company: Option<String>,

    /// Minimum similarity score (0-100) for a roster match
    #[arg(long, value_parser = threshold_arg)]
    pub threshold: Option<u8>,

    /// Song title (skips the prompt)
    #[arg(long)]
    pub song: Option<String>,

    /// Artist name (skips the prompt)
    #[arg(long)]
    pub artist: Option<String>,

    /// Add today's date without asking
    #[arg(long, conflicts_with = "no_date")]
    pub add_date: bool,

    /// Leave the date out without asking
    #[arg(long)]
    pub no_date: bool,
}

pub(crate) fn threshold_arg(value: &str) -> Result<u8, String> {
    parse_threshold(value).map_err(|e| e.to_string())
}

pub fn run(args: GenerateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        company_name: args.company.clone(),
        template_path: args.template.clone(),
        text_path: args.text.clone(),
        roster_path: args.roster.clone(),
        output_dir: args.output_dir.clone(),
        threshold: args.threshold,
    };
    let config = SplitSheetConfig::resolve(args.config.as_deref(), overrides)?;

    // A broken roster is fatal, so find out before anything is written
    let roster = RosterTable::load_from_file(&config.roster_path)?;

    if verbose {
        eprintln!("Template: {}", config.template_path.display());
        eprintln!("Body text: {}", config.text_path.display());
        eprintln!("Roster: {} writers", roster.len());
        eprintln!("Match threshold: {}", config.threshold);
    }

    // Keep stdout clean for machine-readable output
    let console: Box<dyn Write> = match format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json | OutputFormat::Tsv => Box::new(io::stderr()),
    };
    let mut prompter = ConsolePrompter::new(io::stdin().lock(), console);
    let request = gather_request(&args, &config, &mut prompter)?;

    let assembler = DocumentAssembler::new();
    let assembled =
        assembler.assemble_from_paths(&config.template_path, &config.text_path, &request)?;
    for warning in &assembled.warnings {
        prompter.notify(&warning.to_string())?;
    }

    let mut doc = assembled.document;
    let path = output::save(&doc, &config.output_dir, request.song_name.as_deref())?;

    let engine = MatchingEngine::with_config(
        &roster,
        MatchingConfig {
            threshold: config.threshold,
        },
    );
    let mut session = Session::new(engine);
    run_session(&mut session, &mut prompter)?;
    let contributors = session.into_contributors();

    append_contributor_table(&mut doc, &contributors);
    output::overwrite(&doc, &path)?;

    match format {
        OutputFormat::Text => {
            prompter.notify(&format!(
                "Thank you, you may find your template here: {}",
                path.display()
            ))?;
        }
        OutputFormat::Json => print_json_result(&path, &request, &contributors)?,
        OutputFormat::Tsv => print_tsv_result(&path, &contributors),
    }

    Ok(())
}

/// Date, song and artist: taken from flags where given, asked for otherwise
fn gather_request<P: Prompter>(
    args: &GenerateArgs,
    config: &SplitSheetConfig,
    prompter: &mut P,
) -> io::Result<AssemblyRequest> {
    let add_date = if args.add_date || args.no_date {
        args.add_date
    } else {
        prompter.prompt_line(DATE_PROMPT)?.as_deref() == Some(ADD_DATE_ANSWER)
    };

    let song_name = match non_empty(args.song.as_deref()) {
        Some(song) => Some(song),
        None => prompter.prompt_optional(SONG_PROMPT)?,
    };
    let artist_name = match non_empty(args.artist.as_deref()) {
        Some(artist) => Some(artist),
        None => prompter.prompt_optional(ARTIST_PROMPT)?,
    };

    Ok(AssemblyRequest {
        add_date,
        company_name: config.company_name.clone(),
        song_name,
        artist_name,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn print_json_result(
    path: &Path,
    request: &AssemblyRequest,
    contributors: &AcceptedContributors,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "path": path.display().to_string(),
        "song": request.song_name,
        "artist": request.artist_name,
        "dated": request.add_date,
        "contributor_count": contributors.len(),
        "contributors": contributors.as_slice(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(path: &Path, contributors: &AcceptedContributors) {
    println!("path\twriter_name\twriter_ipi\tpublisher_name\tpublisher_ipi\twriter_pro");
    for c in contributors {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            path.display(),
            c.writer_name,
            c.writer_ipi,
            c.publisher_name,
            c.publisher_ipi,
            c.writer_pro
        );
    }
}
