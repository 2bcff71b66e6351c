use std::path::PathBuf;

use clap::Args;

use crate::assembly::assembler::has_unfilled_placeholders;
use crate::cli::OutputFormat;
use crate::core::document::{Block, Document};
use crate::docx::reader;

#[derive(Args)]
pub struct InspectArgs {
    /// Document to inspect (.docx)
    #[arg(required = true)]
    pub input: PathBuf,
}

pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let doc = reader::read_document(&args.input)?;

    if verbose {
        eprintln!(
            "Read {}: {} blocks, {} styles",
            args.input.display(),
            doc.blocks().len(),
            doc.styles().len()
        );
    }

    match format {
        OutputFormat::Text => print_text_document(&args, &doc),
        OutputFormat::Json => print_json_document(&args, &doc)?,
        OutputFormat::Tsv => print_tsv_document(&doc),
    }

    Ok(())
}

fn print_text_document(args: &InspectArgs, doc: &Document) {
    println!("Document: {}", args.input.display());
    println!("{}", "=".repeat(60));

    println!("\nStyles ({}):", doc.styles().len());
    for style in doc.styles().iter() {
        let mut details = Vec::new();
        if let Some(base) = &style.based_on {
            details.push(format!("based on {base}"));
        }
        if let Some(family) = &style.font.family {
            details.push(family.clone());
        }
        if let Some(size) = style.font.size_pt() {
            details.push(format!("{size}pt"));
        }
        if style.font.bold == Some(true) {
            details.push("bold".to_string());
        }
        if style.font.italic == Some(true) {
            details.push("italic".to_string());
        }
        if style.font.underline == Some(true) {
            details.push("underline".to_string());
        }
        if let Some(alignment) = style.alignment {
            details.push(format!("align {}", alignment.as_str()));
        }
        println!(
            "  {:<10} {} [{}] {}",
            style.kind.as_str(),
            style.name,
            style.id,
            details.join(", ")
        );
    }

    println!("\nBody:");
    for (i, block) in doc.blocks().iter().enumerate() {
        match block {
            Block::Paragraph(p) => println!(
                "  {:>3}. [{}] {}",
                i + 1,
                p.style.as_deref().unwrap_or("-"),
                p.text.replace('\n', "\\n").replace('\t', "\\t")
            ),
            Block::Table(t) => println!(
                "  {:>3}. <table {}x{}{}>",
                i + 1,
                t.row_count(),
                t.column_count(),
                t.style
                    .as_deref()
                    .map(|s| format!(", style {s}"))
                    .unwrap_or_default()
            ),
        }
    }

    if has_unfilled_placeholders(doc) {
        println!("\nNote: SONG TITLE / ARTIST NAME placeholders are present");
    }
}

fn print_json_document(args: &InspectArgs, doc: &Document) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "path": args.input.display().to_string(),
        "styles": doc.styles(),
        "blocks": doc.blocks(),
        "has_placeholders": has_unfilled_placeholders(doc),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_document(doc: &Document) {
    println!("index\tkind\tstyle\ttext");
    for (i, block) in doc.blocks().iter().enumerate() {
        match block {
            Block::Paragraph(p) => println!(
                "{}\tparagraph\t{}\t{}",
                i + 1,
                p.style.as_deref().unwrap_or(""),
                p.text.replace('\n', "\\n").replace('\t', "\\t")
            ),
            Block::Table(t) => println!(
                "{}\ttable\t{}\t{}x{}",
                i + 1,
                t.style.as_deref().unwrap_or(""),
                t.row_count(),
                t.column_count()
            ),
        }
    }
}
