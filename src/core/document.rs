use serde::Serialize;

use crate::core::style::StyleRegistry;

/// A paragraph of plain text with an optional named style.
///
/// Line breaks inside the paragraph are stored as `\n`, tabs as `\t`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub text: String,

    /// Style name, as registered in the document's [`StyleRegistry`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A grid of text cells. Row 0 is the header when the table has one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Widest row, used as the column count of the table grid
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A top-level body element, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// In-memory rich-text document: body blocks plus a style registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    styles: StyleRegistry,
    body: Vec<Block>,
}

impl Document {
    /// Create an empty document carrying the built-in styles
    pub fn new() -> Self {
        Self::with_styles(StyleRegistry::builtin())
    }

    /// Create an empty document with the given style registry
    pub fn with_styles(styles: StyleRegistry) -> Self {
        Self {
            styles,
            body: Vec::new(),
        }
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    pub fn blocks(&self) -> &[Block] {
        &self.body
    }

    pub fn push_block(&mut self, block: Block) {
        self.body.push(block);
    }

    /// Append a paragraph of `text` in the named style
    pub fn add_paragraph(&mut self, text: impl Into<String>, style: Option<&str>) {
        let mut paragraph = Paragraph::new(text);
        paragraph.style = style.map(str::to_string);
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Append a filled table
    pub fn add_table(&mut self, table: Table) {
        self.body.push(Block::Table(table));
    }

    /// Top-level paragraphs in order (table cells are not included)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::TITLE_STYLE;

    #[test]
    fn test_blocks_keep_document_order() {
        let mut doc = Document::new();
        doc.add_paragraph("first", None);
        let mut table = Table::new();
        table.add_row(["a", "b"]);
        doc.add_table(table);
        doc.add_paragraph("second", Some(TITLE_STYLE));

        assert_eq!(doc.blocks().len(), 3);
        let texts: Vec<&str> = doc.paragraphs().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(doc.tables().count(), 1);
        assert!(matches!(doc.blocks()[1], Block::Table(_)));
    }

    #[test]
    fn test_added_blocks_keep_style() {
        let mut doc = Document::new();
        doc.add_paragraph("title", Some(TITLE_STYLE));
        doc.add_table(Table::new().with_style("Table Grid"));

        assert_eq!(doc.paragraphs().next().unwrap().style.as_deref(), Some(TITLE_STYLE));
        assert_eq!(doc.tables().next().unwrap().style.as_deref(), Some("Table Grid"));
    }

    #[test]
    fn test_paragraphs_mut_edits_in_place() {
        let mut doc = Document::new();
        doc.add_paragraph("hello", None);
        for p in doc.paragraphs_mut() {
            p.text.push_str(" world");
        }
        assert_eq!(doc.paragraphs().next().unwrap().text, "hello world");
    }

    #[test]
    fn test_table_column_count_uses_widest_row() {
        let mut table = Table::new();
        table.add_row(["a"]);
        table.add_row(["a", "b", "c"]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
    }
}
