use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::core::document::{Block, Document, Paragraph, Table};
use crate::core::style::{Alignment, FontAttributes, Style, StyleKind, StyleRegistry};
use crate::docx::{DocxError, DOCUMENT_PART, STYLES_PART};
use crate::utils::validation::looks_like_docx;

/// Read a `.docx` file into a [`Document`]
///
/// # Errors
///
/// Returns `DocxError::Io` if the file cannot be read, `DocxError::NotAPackage`
/// or `DocxError::Zip` if it is not a valid package, `DocxError::MissingPart`
/// if it has no main document part, or `DocxError::Xml` on malformed XML.
pub fn read_document(path: &Path) -> Result<Document, DocxError> {
    let bytes = std::fs::read(path)?;
    let doc = from_bytes(&bytes)?;
    debug!(
        "Read {} ({} blocks, {} styles)",
        path.display(),
        doc.blocks().len(),
        doc.styles().len()
    );
    Ok(doc)
}

/// Parse an in-memory `.docx` package
///
/// # Errors
///
/// See [`read_document`].
pub fn from_bytes(bytes: &[u8]) -> Result<Document, DocxError> {
    if !looks_like_docx(bytes) {
        return Err(DocxError::NotAPackage);
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let document_xml =
        read_part(&mut archive, DOCUMENT_PART)?.ok_or(DocxError::MissingPart(DOCUMENT_PART))?;

    // A package without a styles part is valid; its paragraphs use defaults
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_styles(&xml)?,
        None => StyleRegistry::new(),
    };

    let body = parse_body(&document_xml, &styles)?;

    let mut doc = Document::with_styles(styles);
    for block in body {
        doc.push_block(block);
    }
    Ok(doc)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DocxError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut xml = String::new();
            file.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse `word/styles.xml` into a registry.
///
/// Only direct style properties are read; document defaults and latent
/// styles are ignored. `basedOn` references are resolved from ids to names.
///
/// # Errors
///
/// Returns `DocxError::Xml` on malformed XML.
pub fn parse_styles(xml: &str) -> Result<StyleRegistry, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut pending: Vec<(Style, Option<String>)> = Vec::new();
    let mut current: Option<(Style, Option<String>)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                on_style_element(&e, &stack, &mut current);
                stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                on_style_element(&e, &stack, &mut current);
                if e.local_name().as_ref() == b"style" {
                    pending.extend(current.take());
                }
            }
            Event::End(e) => {
                stack.pop();
                if e.local_name().as_ref() == b"style" {
                    pending.extend(current.take());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let id_to_name: HashMap<String, String> = pending
        .iter()
        .map(|(style, _)| (style.id.clone(), style.name.clone()))
        .collect();

    let mut registry = StyleRegistry::new();
    for (mut style, based_on_id) in pending {
        style.based_on = based_on_id.map(|id| id_to_name.get(&id).cloned().unwrap_or(id));
        registry.add(style);
    }
    Ok(registry)
}

fn on_style_element(
    e: &BytesStart<'_>,
    stack: &[Vec<u8>],
    current: &mut Option<(Style, Option<String>)>,
) {
    let local = e.local_name();
    let local = local.as_ref();

    if local == b"style" {
        let kind = attribute(e, b"type")
            .and_then(|t| StyleKind::parse(&t))
            .unwrap_or(StyleKind::Paragraph);
        let id = attribute(e, b"styleId").unwrap_or_default();
        let mut style = Style::new(id.clone(), kind);
        if !id.is_empty() {
            style.id = id;
        }
        *current = Some((style, None));
        return;
    }

    let Some((style, based_on)) = current.as_mut() else {
        return;
    };

    let parent: &[u8] = stack.last().map(Vec::as_slice).unwrap_or_default();
    let grandparent: &[u8] = stack
        .len()
        .checked_sub(2)
        .map(|i| stack[i].as_slice())
        .unwrap_or_default();
    let in_style_rpr = parent == b"rPr" && grandparent == b"style";

    match local {
        b"name" if parent == b"style" => {
            if let Some(name) = attribute(e, b"val") {
                style.name = name;
            }
        }
        b"basedOn" if parent == b"style" => *based_on = attribute(e, b"val"),
        b"jc" if parent == b"pPr" && grandparent == b"style" => {
            style.alignment = attribute(e, b"val").and_then(|v| Alignment::parse(&v));
        }
        b"rFonts" if in_style_rpr => {
            style.font.family = attribute(e, b"ascii")
                .or_else(|| attribute(e, b"hAnsi"))
                .or_else(|| attribute(e, b"cs"));
        }
        b"sz" if in_style_rpr => {
            style.font.size_half_points = attribute(e, b"val").and_then(|v| v.parse().ok());
        }
        b"b" if in_style_rpr => style.font.bold = Some(toggle(e)),
        b"i" if in_style_rpr => style.font.italic = Some(toggle(e)),
        b"u" if in_style_rpr => {
            style.font.underline = Some(attribute(e, b"val").is_none_or(|v| v != "none"));
        }
        _ => {}
    }
}

/// On/off property: present without a value means on
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(
        attribute(e, b"val").as_deref(),
        Some("0" | "false" | "off")
    )
}

/// Look up an attribute by local name (ignoring its namespace prefix)
fn attribute(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| {
            let raw = String::from_utf8_lossy(&a.value).into_owned();
            let unescaped = quick_xml::escape::unescape(&raw).map(Cow::into_owned);
            unescaped.unwrap_or(raw)
        })
}

/// Accumulates body blocks while walking `word/document.xml`
#[derive(Default)]
struct BodyParser {
    stack: Vec<Vec<u8>>,
    blocks: Vec<Block>,

    paragraph_text: String,
    paragraph_style_id: Option<String>,
    in_text: bool,

    /// Open `w:txbxContent` elements; their paragraphs join the enclosing one
    text_box_depth: usize,
    /// Open `mc:Fallback` elements; they repeat the preferred `mc:Choice`
    fallback_depth: usize,

    table_depth: usize,
    table: Table,
    table_style_id: Option<String>,
    row: Vec<String>,
    cell_paragraphs: Vec<String>,
}

impl BodyParser {
    fn open(&mut self, e: &BytesStart<'_>) {
        let local = e.local_name();
        let parent: &[u8] = self.stack.last().map(Vec::as_slice).unwrap_or_default();

        if local.as_ref() == b"Fallback" {
            self.fallback_depth += 1;
        }
        if self.fallback_depth > 0 {
            return;
        }
        if local.as_ref() == b"txbxContent" {
            self.text_box_depth += 1;
            return;
        }
        if self.text_box_depth > 0 {
            match local.as_ref() {
                b"p" => self.line_break(),
                b"t" if parent == b"r" => self.in_text = true,
                b"br" | b"cr" if parent == b"r" => self.paragraph_text.push('\n'),
                b"tab" if parent == b"r" => self.paragraph_text.push('\t'),
                _ => {}
            }
            return;
        }

        match local.as_ref() {
            b"p" => {
                self.paragraph_text.clear();
                self.paragraph_style_id = None;
            }
            b"pStyle" if parent == b"pPr" && self.table_depth == 0 => {
                self.paragraph_style_id = attribute(e, b"val");
            }
            b"t" if parent == b"r" => self.in_text = true,
            b"br" | b"cr" if parent == b"r" => self.paragraph_text.push('\n'),
            b"tab" if parent == b"r" => self.paragraph_text.push('\t'),
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Table::new();
                    self.table_style_id = None;
                }
            }
            b"tblStyle" if self.table_depth == 1 && parent == b"tblPr" => {
                self.table_style_id = attribute(e, b"val");
            }
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell_paragraphs.clear(),
            _ => {}
        }
    }

    fn close(&mut self, local: &[u8], styles: &StyleRegistry) {
        if self.fallback_depth > 0 {
            if local == b"Fallback" {
                self.fallback_depth -= 1;
            }
            return;
        }
        if self.text_box_depth > 0 {
            match local {
                b"t" => self.in_text = false,
                b"p" => self.line_break(),
                b"txbxContent" => {
                    self.text_box_depth -= 1;
                    self.line_break();
                }
                _ => {}
            }
            return;
        }

        match local {
            b"t" => self.in_text = false,
            b"p" => {
                let text = std::mem::take(&mut self.paragraph_text);
                if self.table_depth == 0 {
                    let mut paragraph = Paragraph::new(text);
                    paragraph.style = self
                        .paragraph_style_id
                        .take()
                        .map(|id| style_name(styles, id));
                    self.blocks.push(Block::Paragraph(paragraph));
                } else {
                    // Nested tables flatten into the enclosing top-level cell
                    self.cell_paragraphs.push(text);
                }
            }
            b"tc" if self.table_depth == 1 => {
                self.row.push(self.cell_paragraphs.join("\n"));
                self.cell_paragraphs.clear();
            }
            b"tr" if self.table_depth == 1 => {
                self.table.rows.push(std::mem::take(&mut self.row));
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    let mut table = std::mem::take(&mut self.table);
                    table.style = self.table_style_id.take().map(|id| style_name(styles, id));
                    self.blocks.push(Block::Table(table));
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Start a new line unless the text is empty or already ends one
    fn line_break(&mut self) {
        if !self.paragraph_text.is_empty() && !self.paragraph_text.ends_with('\n') {
            self.paragraph_text.push('\n');
        }
    }

    fn text(&mut self, e: &BytesText<'_>) -> Result<(), DocxError> {
        if self.in_text {
            let decoded = e.decode().map_err(quick_xml::Error::from)?;
            let unescaped = quick_xml::escape::unescape(&decoded).map_err(quick_xml::Error::from)?;
            self.paragraph_text.push_str(&unescaped);
        }
        Ok(())
    }

    fn reference(&mut self, e: &BytesRef<'_>) -> Result<(), DocxError> {
        if !self.in_text {
            return Ok(());
        }
        if let Some(ch) = e.resolve_char_ref()? {
            self.paragraph_text.push(ch);
        } else {
            let name = e.decode().map_err(quick_xml::Error::from)?;
            match quick_xml::escape::resolve_predefined_entity(&name) {
                Some(resolved) => self.paragraph_text.push_str(resolved),
                None => debug!("Ignoring unknown entity reference &{name};"),
            }
        }
        Ok(())
    }
}

/// Map a style id to its registered name, falling back to the id itself
fn style_name(styles: &StyleRegistry, id: String) -> String {
    styles.get_by_id(&id).map_or(id, |s| s.name.clone())
}

/// Parse `word/document.xml` into top-level body blocks
///
/// # Errors
///
/// Returns `DocxError::Xml` on malformed XML.
pub fn parse_body(xml: &str, styles: &StyleRegistry) -> Result<Vec<Block>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = BodyParser::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                parser.open(&e);
                parser.stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                parser.open(&e);
                parser.close(e.local_name().as_ref(), styles);
            }
            Event::End(e) => {
                parser.stack.pop();
                parser.close(e.local_name().as_ref(), styles);
            }
            Event::Text(e) => parser.text(&e)?,
            Event::CData(e) => {
                if parser.in_text {
                    parser.paragraph_text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => parser.reference(&e)?,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parser.blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:jc w:val="center"/><w:rPr><w:i/></w:rPr></w:pPr>
    <w:rPr><w:rFonts w:ascii="Georgia" w:hAnsi="Georgia"/><w:b/><w:i w:val="0"/><w:u w:val="single"/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/><w:rPr><w:b/></w:rPr></w:style>
  <w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style>
</w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let styles = parse_styles(STYLES_XML).unwrap();
        assert_eq!(styles.len(), 4);

        let heading = styles.get("heading 1").unwrap();
        assert_eq!(heading.id, "Heading1");
        assert_eq!(heading.kind, StyleKind::Paragraph);
        assert_eq!(heading.based_on.as_deref(), Some("Normal"));
        assert_eq!(heading.alignment, Some(Alignment::Center));
        assert_eq!(heading.font.family.as_deref(), Some("Georgia"));
        assert_eq!(heading.font.size_half_points, Some(32));
        assert_eq!(heading.font.bold, Some(true));
        // The paragraph-mark rPr inside pPr must not leak into the style font
        assert_eq!(heading.font.italic, Some(false));
        assert_eq!(heading.font.underline, Some(true));

        assert_eq!(styles.get("Strong").unwrap().kind, StyleKind::Character);
        assert_eq!(styles.get("Table Grid").unwrap().kind, StyleKind::Table);

        // docDefaults are not a style
        assert_eq!(styles.get("Normal").unwrap().font, FontAttributes::default());
    }

    #[test]
    fn test_parse_body() {
        let styles = parse_styles(STYLES_XML).unwrap();
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
  <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>SPLIT SHEET</w:t></w:r></w:p>
  <w:p><w:r><w:t xml:space="preserve">Song: </w:t></w:r><w:r><w:t>SONG TITLE</w:t><w:br/><w:t>by ARTIST NAME</w:t></w:r></w:p>
  <w:p/>
  <w:tbl>
    <w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr>
    <w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc></w:tr>
  </w:tbl>
  <w:p><w:r><w:t>Rock &amp; Roll</w:t><w:tab/><w:t>end</w:t></w:r></w:p>
  <w:sectPr/>
</w:body>
</w:document>"#;

        let blocks = parse_body(xml, &styles).unwrap();
        assert_eq!(blocks.len(), 5);

        match &blocks[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.text, "SPLIT SHEET");
                assert_eq!(p.style.as_deref(), Some("heading 1"));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        match &blocks[1] {
            Block::Paragraph(p) => {
                assert_eq!(p.text, "Song: SONG TITLE\nby ARTIST NAME");
                assert_eq!(p.style, None);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert_eq!(blocks[2], Block::Paragraph(Paragraph::new("")));
        match &blocks[3] {
            Block::Table(t) => {
                assert_eq!(t.style.as_deref(), Some("Table Grid"));
                assert_eq!(t.rows, vec![vec!["A".to_string(), "B\nC".to_string()]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
        match &blocks[4] {
            Block::Paragraph(p) => assert_eq!(p.text, "Rock & Roll\tend"),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_text_box_joins_enclosing_paragraph() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
<w:body>
  <w:p>
    <w:r><w:t xml:space="preserve">Before SONG TITLE </w:t></w:r>
    <w:r><w:pict><v:textbox><w:txbxContent>
      <w:p><w:r><w:t>Box</w:t></w:r></w:p>
      <w:p><w:r><w:t>Second</w:t></w:r></w:p>
    </w:txbxContent></v:textbox></w:pict></w:r>
    <w:r><w:t>after</w:t></w:r>
  </w:p>
  <w:p>
    <w:r><mc:AlternateContent>
      <mc:Choice Requires="wps"><w:drawing><w:txbxContent><w:p><w:r><w:t>Shape</w:t></w:r></w:p></w:txbxContent></w:drawing></mc:Choice>
      <mc:Fallback><w:pict><w:txbxContent><w:p><w:r><w:t>Shape</w:t></w:r></w:p></w:txbxContent></w:pict></mc:Fallback>
    </mc:AlternateContent></w:r>
    <w:r><w:t>ARTIST NAME</w:t></w:r>
  </w:p>
</w:body>
</w:document>"#;

        let blocks = parse_body(xml, &StyleRegistry::new()).unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(Paragraph::new("Before SONG TITLE \nBox\nSecond\nafter")),
                Block::Paragraph(Paragraph::new("Shape\nARTIST NAME")),
            ]
        );
    }

    #[test]
    fn test_not_a_package() {
        let result = from_bytes(b"plain text, not a docx");
        assert!(matches!(result, Err(DocxError::NotAPackage)));
    }

    #[test]
    fn test_missing_document_part() {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            std::io::Write::write_all(&mut zip, STYLES_XML.as_bytes()).unwrap();
            zip.finish().unwrap();
        }

        let result = from_bytes(&buffer);
        assert!(matches!(result, Err(DocxError::MissingPart(DOCUMENT_PART))));
    }

    #[test]
    fn test_malformed_xml() {
        let styles = StyleRegistry::new();
        let result = parse_body("<w:document><w:body></w:document>", &styles);
        assert!(matches!(result, Err(DocxError::Xml(_))));
    }
}
