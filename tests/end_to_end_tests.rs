//! Library-level end-to-end scenarios: search, accept, tabulate, save.

use split_sheet::assembly::assembler::{AssemblyRequest, DocumentAssembler};
use split_sheet::assembly::{output, table};
use split_sheet::docx::reader;
use split_sheet::session::{Session, SessionEvent};
use split_sheet::{ContributorRecord, Document, MatchingEngine, RosterTable};

fn jane_roster() -> RosterTable {
    RosterTable::from_records(vec![ContributorRecord::new("Jane Doe")
        .with_writer_ipi("00012345678")
        .with_publisher("Doe Songs", "00087654321")
        .with_pro("ASCAP")])
}

#[test]
fn test_single_match_accept_and_finish() {
    let roster = jane_roster();
    let engine = MatchingEngine::new(&roster);

    let matches = engine.find_matches("jane doe");
    assert_eq!(matches.len(), 1);
    assert!(matches[0].score >= 75);

    let mut session = Session::new(engine);
    assert_eq!(session.handle("jane doe"), SessionEvent::CandidatesFound(1));
    assert!(matches!(session.handle("1"), SessionEvent::Accepted(_)));
    assert_eq!(session.handle("0"), SessionEvent::Finished);

    let mut doc = Document::new();
    table::append_contributor_table(&mut doc, &session.into_contributors());

    let contributor_table = doc.tables().next().unwrap();
    assert_eq!(contributor_table.rows.len(), 2);
    assert_eq!(contributor_table.rows[1][0], "Jane Doe\nIPI: 00012345678");

    let signatures: Vec<&str> = doc
        .paragraphs()
        .map(|p| p.text.as_str())
        .filter(|t| t.contains("Signature: "))
        .collect();
    assert_eq!(signatures.len(), 1);
    assert!(signatures[0].contains("Signature: Jane Doe"));
}

#[test]
fn test_two_saves_same_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let request = AssemblyRequest {
        song_name: Some("Song".to_string()),
        ..AssemblyRequest::default()
    };
    let assembler = DocumentAssembler::new();

    let mut paths = Vec::new();
    for _ in 0..2 {
        let assembled = assembler.assemble(&Document::new(), &Document::new(), &request);
        paths.push(output::save(&assembled.document, dir.path(), request.song_name.as_deref()).unwrap());
    }

    assert_eq!(paths[0], dir.path().join("Song_V1_Split_Sheet.docx"));
    assert_eq!(paths[1], dir.path().join("Song_V2_Split_Sheet.docx"));
}

#[test]
fn test_saved_draft_then_final_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let roster = jane_roster();

    let mut body = Document::new();
    body.add_paragraph("SONG TITLE and SONG TITLE", None);
    let request = AssemblyRequest {
        add_date: false,
        company_name: None,
        song_name: Some("Test".to_string()),
        artist_name: None,
    };
    let mut doc = DocumentAssembler::new()
        .assemble(&Document::new(), &body, &request)
        .document;
    let path = output::save(&doc, dir.path(), Some("Test")).unwrap();

    let mut session = Session::new(MatchingEngine::new(&roster));
    for input in ["jane", "1", "0"] {
        session.handle(input);
    }
    table::append_contributor_table(&mut doc, session.accepted());
    output::overwrite(&doc, &path).unwrap();

    let saved = reader::read_document(&path).unwrap();
    let texts: Vec<&str> = saved.paragraphs().map(|p| p.text.as_str()).collect();
    assert_eq!(texts[0], "Company Name Not Specified");
    assert_eq!(texts[1], "\"Test\" and \"Test\"");
    assert_eq!(saved.tables().count(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
