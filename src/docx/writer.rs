use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::document::{Block, Document, Paragraph, Table};
use crate::core::style::{Style, StyleKind, StyleRegistry, NORMAL_STYLE, TABLE_GRID_STYLE};
use crate::docx::{
    DocxError, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, PACKAGE_RELS_PART,
    STYLES_PART, W_NS,
};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Table border edges drawn for bordered tables
const BORDER_EDGES: [&str; 6] = ["top", "left", "bottom", "right", "insideH", "insideV"];

/// US Letter page, one-inch margins (twentieths of a point)
const PAGE_SIZE: [(&str, &str); 2] = [("w:w", "12240"), ("w:h", "15840")];
const PAGE_MARGINS: [(&str, &str); 7] = [
    ("w:top", "1440"),
    ("w:right", "1440"),
    ("w:bottom", "1440"),
    ("w:left", "1440"),
    ("w:header", "720"),
    ("w:footer", "720"),
    ("w:gutter", "0"),
];

/// Write a document to a `.docx` file, replacing any existing file
///
/// # Errors
///
/// Returns `DocxError::Io` if the file cannot be created or written.
pub fn save_to_path(doc: &Document, path: &Path) -> Result<(), DocxError> {
    let file = File::create(path)?;
    let mut sink = write_package(doc, BufWriter::new(file))?;
    sink.flush()?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Serialize a document into an in-memory `.docx` package
///
/// # Errors
///
/// Returns an error if XML or zip serialization fails.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>, DocxError> {
    let cursor = write_package(doc, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// Write all package parts into `sink` and return it
///
/// # Errors
///
/// Returns an error if XML or zip serialization fails.
pub fn write_package<W: Write + Seek>(doc: &Document, sink: W) -> Result<W, DocxError> {
    let mut zip = ZipWriter::new(sink);

    let parts: [(&str, Vec<u8>); 5] = [
        (CONTENT_TYPES_PART, CONTENT_TYPES_XML.as_bytes().to_vec()),
        (PACKAGE_RELS_PART, PACKAGE_RELS_XML.as_bytes().to_vec()),
        (DOCUMENT_RELS_PART, DOCUMENT_RELS_XML.as_bytes().to_vec()),
        (STYLES_PART, styles_xml(doc.styles())?),
        (DOCUMENT_PART, document_xml(doc)?),
    ];

    for (name, content) in parts {
        zip.start_file(name, part_options())?;
        zip.write_all(&content)?;
    }

    Ok(zip.finish()?)
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Render `word/document.xml`
///
/// # Errors
///
/// Returns `DocxError::Io` if the XML writer fails.
pub fn document_xml(doc: &Document) -> Result<Vec<u8>, DocxError> {
    let mut w = Writer::new(Vec::new());
    declaration(&mut w)?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", W_NS));
    w.write_event(Event::Start(root))?;
    start(&mut w, "w:body", &[])?;

    for block in doc.blocks() {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut w, p, doc.styles())?,
            Block::Table(t) => write_table(&mut w, t, doc.styles())?,
        }
    }

    start(&mut w, "w:sectPr", &[])?;
    empty(&mut w, "w:pgSz", &PAGE_SIZE)?;
    empty(&mut w, "w:pgMar", &PAGE_MARGINS)?;
    end(&mut w, "w:sectPr")?;

    end(&mut w, "w:body")?;
    end(&mut w, "w:document")?;
    Ok(w.into_inner())
}

fn write_paragraph<W: Write>(
    w: &mut Writer<W>,
    paragraph: &Paragraph,
    styles: &StyleRegistry,
) -> Result<(), DocxError> {
    start(w, "w:p", &[])?;

    if let Some(style) = &paragraph.style {
        let id = styles.id_for_name(style);
        start(w, "w:pPr", &[])?;
        empty(w, "w:pStyle", &[("w:val", id.as_str())])?;
        end(w, "w:pPr")?;
    }

    if !paragraph.text.is_empty() {
        start(w, "w:r", &[])?;
        for (i, line) in paragraph.text.split('\n').enumerate() {
            if i > 0 {
                empty(w, "w:br", &[])?;
            }
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    empty(w, "w:tab", &[])?;
                }
                if !segment.is_empty() {
                    start(w, "w:t", &[("xml:space", "preserve")])?;
                    w.write_event(Event::Text(BytesText::new(&xml_chars(segment))))?;
                    end(w, "w:t")?;
                }
            }
        }
        end(w, "w:r")?;
    }

    end(w, "w:p")
}

fn write_table<W: Write>(
    w: &mut Writer<W>,
    table: &Table,
    styles: &StyleRegistry,
) -> Result<(), DocxError> {
    let columns = table.column_count().max(1);

    start(w, "w:tbl", &[])?;

    start(w, "w:tblPr", &[])?;
    if let Some(style) = &table.style {
        let id = styles.id_for_name(style);
        empty(w, "w:tblStyle", &[("w:val", id.as_str())])?;
    }
    empty(w, "w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    if table.style.as_deref() == Some(TABLE_GRID_STYLE) {
        write_borders(w, "w:tblBorders")?;
    }
    end(w, "w:tblPr")?;

    start(w, "w:tblGrid", &[])?;
    let column_width = (9360 / columns).to_string();
    for _ in 0..columns {
        empty(w, "w:gridCol", &[("w:w", column_width.as_str())])?;
    }
    end(w, "w:tblGrid")?;

    for row in &table.rows {
        start(w, "w:tr", &[])?;
        for i in 0..columns {
            let text = row.get(i).map_or("", String::as_str);
            start(w, "w:tc", &[])?;
            start(w, "w:tcPr", &[])?;
            empty(w, "w:tcW", &[("w:w", column_width.as_str()), ("w:type", "dxa")])?;
            end(w, "w:tcPr")?;
            // Every cell needs at least one paragraph
            write_paragraph(w, &Paragraph::new(text), styles)?;
            end(w, "w:tc")?;
        }
        end(w, "w:tr")?;
    }

    end(w, "w:tbl")
}

fn write_borders<W: Write>(w: &mut Writer<W>, element: &str) -> Result<(), DocxError> {
    start(w, element, &[])?;
    for edge in BORDER_EDGES {
        empty(
            w,
            &format!("w:{edge}"),
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "auto"),
            ],
        )?;
    }
    end(w, element)
}

/// Render `word/styles.xml`
///
/// # Errors
///
/// Returns `DocxError::Io` if the XML writer fails.
pub fn styles_xml(styles: &StyleRegistry) -> Result<Vec<u8>, DocxError> {
    let mut w = Writer::new(Vec::new());
    declaration(&mut w)?;

    let mut root = BytesStart::new("w:styles");
    root.push_attribute(("xmlns:w", W_NS));
    w.write_event(Event::Start(root))?;

    for style in styles.iter() {
        write_style(&mut w, style, styles)?;
    }

    end(&mut w, "w:styles")?;
    Ok(w.into_inner())
}

fn write_style<W: Write>(
    w: &mut Writer<W>,
    style: &Style,
    styles: &StyleRegistry,
) -> Result<(), DocxError> {
    let mut attrs = vec![("w:type", style.kind.as_str()), ("w:styleId", style.id.as_str())];
    if style.name == NORMAL_STYLE && style.kind == StyleKind::Paragraph {
        attrs.push(("w:default", "1"));
    }
    start(w, "w:style", &attrs)?;
    empty(w, "w:name", &[("w:val", style.name.as_str())])?;

    if let Some(base) = &style.based_on {
        let id = styles.id_for_name(base);
        empty(w, "w:basedOn", &[("w:val", id.as_str())])?;
    }

    if let Some(alignment) = style.alignment {
        start(w, "w:pPr", &[])?;
        empty(w, "w:jc", &[("w:val", alignment.as_str())])?;
        end(w, "w:pPr")?;
    }

    let font = &style.font;
    if !font.is_empty() {
        start(w, "w:rPr", &[])?;
        if let Some(family) = &font.family {
            let family = family.as_str();
            empty(
                w,
                "w:rFonts",
                &[("w:ascii", family), ("w:hAnsi", family), ("w:cs", family)],
            )?;
        }
        write_toggle(w, "w:b", font.bold)?;
        write_toggle(w, "w:i", font.italic)?;
        if let Some(size) = font.size_half_points {
            let size = size.to_string();
            empty(w, "w:sz", &[("w:val", size.as_str())])?;
            empty(w, "w:szCs", &[("w:val", size.as_str())])?;
        }
        if let Some(underline) = font.underline {
            let value = if underline { "single" } else { "none" };
            empty(w, "w:u", &[("w:val", value)])?;
        }
        end(w, "w:rPr")?;
    }

    if style.kind == StyleKind::Table && style.name == TABLE_GRID_STYLE {
        start(w, "w:tblPr", &[])?;
        write_borders(w, "w:tblBorders")?;
        end(w, "w:tblPr")?;
    }

    end(w, "w:style")
}

fn write_toggle<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    value: Option<bool>,
) -> Result<(), DocxError> {
    match value {
        Some(true) => empty(w, name, &[]),
        Some(false) => empty(w, name, &[("w:val", "0")]),
        None => Ok(()),
    }
}

fn declaration<W: Write>(w: &mut Writer<W>) -> Result<(), DocxError> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(())
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, LF and
/// CR, plus U+FFFE and U+FFFF). Markup characters are escaped by quick-xml.
fn xml_chars(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for &(key, value) in attrs {
        element.push_attribute((key, &*xml_chars(value)));
    }
    element
}

fn start<W: Write>(w: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
    w.write_event(Event::Start(element(name, attrs)))?;
    Ok(())
}

fn empty<W: Write>(w: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
    w.write_event(Event::Empty(element(name, attrs)))?;
    Ok(())
}

fn end<W: Write>(w: &mut Writer<W>, name: &str) -> Result<(), DocxError> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::{Alignment, FontAttributes, TITLE_STYLE};
    use crate::docx::reader;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.styles_mut().add(
            Style::new("Body Text", StyleKind::Paragraph)
                .based_on(NORMAL_STYLE)
                .with_alignment(Alignment::Justify)
                .with_font(FontAttributes {
                    family: Some("Georgia".to_string()),
                    size_half_points: Some(22),
                    bold: Some(false),
                    italic: Some(true),
                    underline: Some(true),
                }),
        );
        doc.add_paragraph("Acme Music", Some(TITLE_STYLE));
        doc.add_paragraph("Line one\nLine two\twith tab & <markup>", Some("Body Text"));
        doc.add_paragraph("", None);
        let mut table = Table::new().with_style(TABLE_GRID_STYLE);
        table.add_row(["WRITERS", "PRO"]);
        table.add_row(["Jane Doe\nIPI: 1", "ASCAP"]);
        doc.add_table(table);
        doc.add_paragraph("after", None);
        doc
    }

    #[test]
    fn test_written_package_reads_back() {
        let doc = sample_document();
        let bytes = to_bytes(&doc).unwrap();
        let read = reader::from_bytes(&bytes).unwrap();

        assert_eq!(read.blocks(), doc.blocks());
        assert_eq!(read.styles().get("Body Text"), doc.styles().get("Body Text"));
        assert_eq!(read.styles().len(), doc.styles().len());
    }

    #[test]
    fn test_document_xml_escapes_text() {
        let xml = String::from_utf8(document_xml(&sample_document()).unwrap()).unwrap();
        assert!(xml.contains("with tab &amp; &lt;markup&gt;"));
        assert!(xml.contains(r#"<w:pStyle w:val="BodyText"/>"#));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
        assert!(xml.contains("<w:tblBorders>"));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let mut doc = Document::new();
        doc.add_paragraph("My\u{1b}[DSong\u{7}", None);
        let mut table = Table::new();
        table.add_row(["Jane\u{0}Doe"]);
        doc.add_table(table);

        let xml = String::from_utf8(document_xml(&doc).unwrap()).unwrap();
        assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(xml.contains("My[DSong"));
        assert!(xml.contains("JaneDoe"));

        let read = reader::from_bytes(&to_bytes(&doc).unwrap()).unwrap();
        assert_eq!(read.paragraphs().next().unwrap().text, "My[DSong");
    }

    #[test]
    fn test_styles_xml_marks_normal_default() {
        let xml = String::from_utf8(styles_xml(&StyleRegistry::builtin()).unwrap()).unwrap();
        assert!(xml.contains(r#"w:styleId="Normal" w:default="1""#));
        assert!(xml.contains(r#"<w:basedOn w:val="Normal"/>"#));
    }

    #[test]
    fn test_save_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        save_to_path(&sample_document(), &path).unwrap();

        let read = reader::read_document(&path).unwrap();
        assert_eq!(read.paragraphs().count(), 4);
        assert_eq!(read.tables().count(), 1);
    }
}
