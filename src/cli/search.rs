use std::path::PathBuf;

use clap::Args;

use crate::cli::generate::threshold_arg;
use crate::cli::OutputFormat;
use crate::config::{ConfigOverrides, SplitSheetConfig};
use crate::matching::engine::{MatchCandidate, MatchingConfig, MatchingEngine};
use crate::matching::similarity::NameSimilarity;
use crate::roster::store::RosterTable;
use crate::session::prompt::describe_candidate;
use crate::utils::validation::DEFAULT_MATCH_THRESHOLD;

#[derive(Args)]
pub struct SearchArgs {
    /// Writer name to look up
    #[arg(required = true)]
    pub name: String,

    /// Contributor roster (CSV or TSV)
    #[arg(long, required_unless_present = "config")]
    pub roster: Option<PathBuf>,

    /// Configuration file naming the roster (used when --roster is not given)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum similarity score (0-100)
    #[arg(long, value_parser = threshold_arg)]
    pub threshold: Option<u8>,
}

pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (roster_path, threshold) = match (&args.roster, &args.config) {
        (Some(roster), _) => (
            roster.clone(),
            args.threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD),
        ),
        (None, Some(config)) => {
            let overrides = ConfigOverrides {
                threshold: args.threshold,
                ..ConfigOverrides::default()
            };
            let config = SplitSheetConfig::resolve(Some(config.as_path()), overrides)?;
            (config.roster_path, config.threshold)
        }
        (None, None) => anyhow::bail!("Either --roster or --config is required"),
    };

    let roster = RosterTable::load_from_file(&roster_path)?;
    if verbose {
        eprintln!("Roster: {} ({} writers)", roster_path.display(), roster.len());
    }

    let engine = MatchingEngine::with_config(&roster, MatchingConfig { threshold });
    let candidates = engine.find_matches(&args.name);

    match format {
        OutputFormat::Text => print_text_candidates(&args.name, threshold, &candidates, verbose),
        OutputFormat::Json => print_json_candidates(&args.name, threshold, &candidates)?,
        OutputFormat::Tsv => print_tsv_candidates(&candidates),
    }

    Ok(())
}

fn print_text_candidates(query: &str, threshold: u8, candidates: &[MatchCandidate], verbose: bool) {
    if candidates.is_empty() {
        println!("No matches found for '{query}' (threshold {threshold})");
        return;
    }

    println!(
        "{} candidate(s) for '{query}' (threshold {threshold}):",
        candidates.len()
    );
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{}", describe_candidate(i + 1, candidate));
        if verbose {
            let s = NameSimilarity::calculate(&candidate.record.writer_name, query);
            let partial = s
                .partial_ratio
                .map_or_else(|| "-".to_string(), |p| format!("{p:.1}"));
            println!(
                "   ratio {:.1}, token sort {:.1}, partial {partial}",
                s.ratio, s.token_sort_ratio
            );
        }
    }
}

fn print_json_candidates(
    query: &str,
    threshold: u8,
    candidates: &[MatchCandidate],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "query": query,
        "threshold": threshold,
        "candidates": candidates
            .iter()
            .map(|c| {
                serde_json::json!({
                    "roster_index": c.roster_index,
                    "score": c.score,
                    "record": c.record,
                    "similarity": NameSimilarity::calculate(&c.record.writer_name, query),
                })
            })
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_candidates(candidates: &[MatchCandidate]) {
    println!("rank\troster_index\twriter_name\twriter_ipi\tpublisher_name\tpublisher_ipi\twriter_pro\tscore");
    for (i, c) in candidates.iter().enumerate() {
        let r = &c.record;
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            c.roster_index,
            r.writer_name,
            r.writer_ipi,
            r.publisher_name,
            r.publisher_ipi,
            r.writer_pro,
            c.score
        );
    }
}
