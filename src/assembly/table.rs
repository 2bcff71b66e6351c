use tracing::debug;

use crate::core::contributor::{AcceptedContributors, ContributorRecord};
use crate::core::document::{Document, Table};
use crate::core::style::TABLE_GRID_STYLE;

/// Column headers of the contributor table
pub const TABLE_HEADER: [&str; 5] = ["WRITERS", "PUBLISHERS", "OWNERSHIP (%)", "PRO", "SIGNATURE"];

/// Signature blocks placed side by side on one line of the document
pub const SIGNATURES_PER_ROW: usize = 3;

/// Rule the contributor signs on
pub const SIGNATURE_RULE: &str = "_____________________________";

/// Append the contributor table, a spacer paragraph and the signature blocks.
///
/// Rows and signature blocks follow acceptance order. An empty contributor
/// list still produces the header row and the spacer.
pub fn append_contributor_table(doc: &mut Document, contributors: &AcceptedContributors) {
    let mut table = Table::new().with_style(TABLE_GRID_STYLE);
    table.add_row(TABLE_HEADER);
    for record in contributors {
        table.add_row(contributor_row(record));
    }
    doc.add_table(table);

    doc.add_paragraph("\n", None);

    let records = contributors.as_slice();
    for group in records.chunks(SIGNATURES_PER_ROW) {
        let line: String = group.iter().map(signature_block).collect();
        doc.add_paragraph(line, None);
    }

    debug!(
        "Appended contributor table with {} rows and {} signature lines",
        records.len(),
        records.len().div_ceil(SIGNATURES_PER_ROW)
    );
}

fn contributor_row(record: &ContributorRecord) -> [String; 5] {
    [
        format!("{}\nIPI: {}", record.writer_name, record.writer_ipi),
        format!("{}\nIPI: {}", record.publisher_name, record.publisher_ipi),
        String::new(),
        record.writer_pro.clone(),
        String::new(),
    ]
}

/// Rule line and caption, followed by two line breaks
fn signature_block(record: &ContributorRecord) -> String {
    format!("{SIGNATURE_RULE}\nSignature: {}\n\n", record.writer_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Block;

    fn contributors(n: usize) -> AcceptedContributors {
        let mut accepted = AcceptedContributors::new();
        for i in 1..=n {
            accepted.push(
                ContributorRecord::new(format!("Writer {i}"))
                    .with_writer_ipi(format!("W{i}"))
                    .with_publisher(format!("Publisher {i}"), format!("P{i}"))
                    .with_pro("BMI"),
            );
        }
        accepted
    }

    #[test]
    fn test_empty_list_gives_header_only() {
        let mut doc = Document::new();
        append_contributor_table(&mut doc, &AcceptedContributors::new());

        let tables: Vec<_> = doc.tables().collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![TABLE_HEADER.map(String::from).to_vec()]);
        assert_eq!(tables[0].style.as_deref(), Some(TABLE_GRID_STYLE));

        // Only the spacer follows the table
        let texts: Vec<&str> = doc.paragraphs().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["\n"]);
    }

    #[test]
    fn test_rows_follow_acceptance_order() {
        let mut doc = Document::new();
        append_contributor_table(&mut doc, &contributors(2));

        let table = doc.tables().next().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.rows[1],
            vec![
                "Writer 1\nIPI: W1".to_string(),
                "Publisher 1\nIPI: P1".to_string(),
                String::new(),
                "BMI".to_string(),
                String::new(),
            ]
        );
        assert!(table.rows[2][0].starts_with("Writer 2\n"));
    }

    #[test]
    fn test_signature_blocks_grouped_by_three() {
        let mut doc = Document::new();
        append_contributor_table(&mut doc, &contributors(7));

        let lines: Vec<&str> = doc
            .paragraphs()
            .skip(1)
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(lines.len(), 3);

        let counts: Vec<usize> = lines.iter().map(|l| l.matches("Signature: ").count()).collect();
        assert_eq!(counts, vec![3, 3, 1]);
        assert!(lines[2].contains("Signature: Writer 7"));
        assert_eq!(
            lines[0],
            format!(
                "{SIGNATURE_RULE}\nSignature: Writer 1\n\n\
                 {SIGNATURE_RULE}\nSignature: Writer 2\n\n\
                 {SIGNATURE_RULE}\nSignature: Writer 3\n\n"
            )
        );
    }

    #[test]
    fn test_appends_after_existing_content() {
        let mut doc = Document::new();
        doc.add_paragraph("Body", None);
        append_contributor_table(&mut doc, &contributors(1));

        assert!(matches!(doc.blocks()[0], Block::Paragraph(_)));
        assert!(matches!(doc.blocks()[1], Block::Table(_)));
        assert_eq!(doc.blocks().len(), 4);
    }
}
