use serde::{Deserialize, Serialize};

/// Name of the built-in default paragraph style
pub const NORMAL_STYLE: &str = "Normal";

/// Name of the built-in title paragraph style
pub const TITLE_STYLE: &str = "Title";

/// Name of the built-in bordered table style
pub const TABLE_GRID_STYLE: &str = "Table Grid";

/// What a style applies to (`w:type` in the styles part)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::Numbering),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
            Self::Table => "table",
            Self::Numbering => "numbering",
        }
    }
}

/// Paragraph alignment (`w:jc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    /// Parse a `w:jc` value, accepting both the transitional and strict spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "justify" => Some(Self::Justify),
            "distribute" => Some(Self::Distribute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
            Self::Distribute => "distribute",
        }
    }
}

/// Font attributes of a style. `None` means "inherit".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Size in half-points, as stored by `w:sz`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_half_points: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl FontAttributes {
    /// Font size in points
    pub fn size_pt(&self) -> Option<f32> {
        #[allow(clippy::cast_precision_loss)] // half-point sizes are tiny
        self.size_half_points.map(|half| half as f32 / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named style definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Identifier used by paragraphs to reference this style (`w:styleId`)
    pub id: String,

    /// Human-readable style name (`w:name`); the lookup key of the registry
    pub name: String,

    pub kind: StyleKind,

    /// Name of the style this one inherits from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,

    #[serde(default, skip_serializing_if = "FontAttributes::is_empty")]
    pub font: FontAttributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl Style {
    pub fn new(name: impl Into<String>, kind: StyleKind) -> Self {
        let name = name.into();
        Self {
            id: style_id_for(&name),
            name,
            kind,
            based_on: None,
            font: FontAttributes::default(),
            alignment: None,
        }
    }

    #[must_use]
    pub fn based_on(mut self, base: impl Into<String>) -> Self {
        self.based_on = Some(base.into());
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontAttributes) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Derive a style id from a style name: "heading 1" -> "Heading1", "Table Grid" -> "TableGrid".
pub fn style_id_for(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for word in name.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            id.extend(first.to_uppercase());
            id.push_str(chars.as_str());
        }
    }
    if id.is_empty() {
        "Style".to_string()
    } else {
        id
    }
}

/// Ordered collection of styles keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleRegistry {
    styles: Vec<Style>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The styles every freshly created document starts with
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.add(Style::new(NORMAL_STYLE, StyleKind::Paragraph));
        registry.add(
            Style::new(TITLE_STYLE, StyleKind::Paragraph)
                .based_on(NORMAL_STYLE)
                .with_font(FontAttributes {
                    size_half_points: Some(56),
                    ..FontAttributes::default()
                }),
        );
        registry.add(Style::new(TABLE_GRID_STYLE, StyleKind::Table));
        registry
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.name == name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Add a style, replacing any existing style of the same name.
    ///
    /// If another style already uses the same id, the new style's id gets a
    /// numeric suffix so that ids stay unique within the registry.
    pub fn add(&mut self, mut style: Style) {
        self.styles.retain(|s| s.name != style.name);
        if self.get_by_id(&style.id).is_some() {
            let base = style.id.clone();
            let mut n = 2;
            while self.get_by_id(&format!("{base}{n}")).is_some() {
                n += 1;
            }
            style.id = format!("{base}{n}");
        }
        self.styles.push(style);
    }

    /// Resolve a style name to the id written into the document
    pub fn id_for_name(&self, name: &str) -> String {
        self.get(name)
            .map_or_else(|| style_id_for(name), |s| s.id.clone())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.styles.iter()
    }

    /// Styles of a single kind, in registry order
    pub fn of_kind(&self, kind: StyleKind) -> impl Iterator<Item = &Style> {
        self.styles.iter().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
