use tracing::debug;

use crate::core::document::Document;
use crate::core::style::{Style, StyleKind};

/// Copy every paragraph style of `source` that `target` does not yet define.
///
/// The copy carries the base style, font family and size, bold, italic and
/// underline flags, and paragraph alignment. Styles already present in
/// `target` (by name) are left alone, so running the merge twice is a no-op.
/// Character and table styles are not copied.
///
/// Returns the number of styles added.
pub fn merge_paragraph_styles(source: &Document, target: &mut Document) -> usize {
    let mut added = 0;

    for style in source.styles().of_kind(StyleKind::Paragraph) {
        if target.styles().contains(&style.name) {
            continue;
        }

        let mut copy = Style::new(style.name.clone(), StyleKind::Paragraph)
            .with_font(style.font.clone());
        copy.based_on.clone_from(&style.based_on);
        copy.alignment = style.alignment;

        debug!("Copying paragraph style '{}'", style.name);
        target.styles_mut().add(copy);
        added += 1;
    }

    added
}
