//! Low-level WordprocessingML builders shared by the renderers.
//!
//! Everything here produces block-level XML consumable by
//! `rf_docx::Fragment`; styling is inlined so fragments render the same
//! regardless of the template's paragraph styles.

use rf_docx::xml_escape;

/// Inline run styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Monospace font at reduced size.
    pub mono: bool,
    /// Text color as hex RGB, no `#`.
    pub color: Option<&'static str>,
}

/// Monospace font used for code runs.
pub const MONO_FONT: &str = "Consolas";

/// Code run size in half-points (9pt).
pub const MONO_SIZE: u32 = 18;

/// A styled text run.
pub fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.mono {
        props.push_str(&format!(
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>",
            font = MONO_FONT
        ));
    }
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }
    if let Some(color) = style.color {
        props.push_str(&format!("<w:color w:val=\"{}\"/>", color));
    }
    if style.mono {
        props.push_str(&format!("<w:sz w:val=\"{}\"/>", MONO_SIZE));
    }

    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    };
    format!(
        "<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        props,
        xml_escape(text)
    )
}

/// An explicit line break run.
pub fn line_break() -> String {
    "<w:r><w:br/></w:r>".to_string()
}

/// A paragraph wrapping pre-built runs.
pub fn paragraph(runs_xml: &str) -> String {
    format!("<w:p>{}</w:p>", runs_xml)
}

/// A full-width single-cell table around block content.
///
/// `border_color: None` renders an invisible wrapper (used for prose so
/// multi-line text flows consistently); `Some` draws a thin single border.
/// `fill` shades the cell.
pub fn single_cell_table(
    content_xml: &str,
    border_color: Option<&str>,
    fill: Option<&str>,
) -> String {
    let borders = match border_color {
        Some(color) => format!(
            concat!(
                "<w:tblBorders>",
                "<w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{c}\"/>",
                "<w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{c}\"/>",
                "<w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{c}\"/>",
                "<w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{c}\"/>",
                "</w:tblBorders>"
            ),
            c = color
        ),
        None => concat!(
            "<w:tblBorders>",
            "<w:top w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>",
            "<w:left w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>",
            "<w:bottom w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>",
            "<w:right w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>",
            "</w:tblBorders>"
        )
        .to_string(),
    };
    let shading = match fill {
        Some(color) => format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            color
        ),
        None => String::new(),
    };

    format!(
        concat!(
            "<w:tbl>",
            "<w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/>{borders}</w:tblPr>",
            "<w:tblGrid><w:gridCol/></w:tblGrid>",
            "<w:tr><w:tc><w:tcPr>{shading}</w:tcPr>{content}</w:tc></w:tr>",
            "</w:tbl>"
        ),
        borders = borders,
        shading = shading,
        content = content_xml,
    )
}
