//! Pre-built document fragments injected wholesale into a template.

/// Block-level WordprocessingML fragment (table/paragraph tree).
///
/// Built by the rendering layer; the processor treats the contents as
/// opaque and splices it in place of a marker paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    xml: String,
}

impl Fragment {
    /// Wrap already-valid block-level XML.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// The raw XML.
    pub fn as_xml(&self) -> &str {
        &self.xml
    }

    /// Concatenate two fragments.
    pub fn append(&mut self, other: &Fragment) {
        self.xml.push_str(&other.xml);
    }
}

/// A chart ready for embedding: the DrawingML chart part plus its extent.
///
/// The processor stores the part under `word/charts/`, registers the
/// content-type override and relationship, and anchors it with an inline
/// drawing of the given size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFragment {
    /// Complete `c:chartSpace` part XML.
    pub part_xml: String,
    /// Drawing name shown in the document.
    pub name: String,
    /// Anchor width in EMU.
    pub width_emu: u64,
    /// Anchor height in EMU.
    pub height_emu: u64,
}

/// Escape text for placement inside XML content or attribute values.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
