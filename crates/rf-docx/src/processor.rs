//! Template processor: in-place rewriting of `word/document.xml`.
//!
//! Markers are textual: `${name}` for scalar placeholders, paired
//! `${name}`/`${/name}` paragraphs for repeatable blocks, and a `${name}`
//! inside a table row for repeatable rows. Cloning appends `#i` to every
//! macro inside clone `i`, so nested regions compose to `outer.inner#i#j`.

use crate::package::{DocxPackage, DOCUMENT_PART};
use crate::{ChartFragment, DocxError, Fragment, Result, TemplateKey};
use image::GenericImageView;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Macros split across more characters than this are left untouched by the
/// repair pass.
const MACRO_SCAN_LIMIT: usize = 1024;

const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const CHART_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
const CHART_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";

/// Loaded template with in-progress substitution state.
///
/// Exclusively owned by one render invocation; `save` consumes the
/// processor and returns the finished package bytes.
#[derive(Debug)]
pub struct TemplateProcessor {
    package: DocxPackage,
    document: String,
    next_image: usize,
    next_chart: usize,
    next_drawing_id: usize,
}

impl TemplateProcessor {
    /// Open a template from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_package(DocxPackage::open(path)?)
    }

    /// Open a template from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_package(DocxPackage::from_bytes(bytes)?)
    }

    /// Open a template from any `Read + Seek` source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(DocxPackage::from_reader(reader)?)
    }

    fn from_package(package: DocxPackage) -> Result<Self> {
        let document = fix_broken_macros(&package.text_part(DOCUMENT_PART)?);
        let next_image = next_media_number(&package, "word/media/image");
        let next_chart = next_media_number(&package, "word/charts/chart");
        Ok(Self {
            package,
            document,
            next_image,
            next_chart,
            next_drawing_id: 1000,
        })
    }

    /// Current document XML (for inspection in tests).
    pub fn document_xml(&self) -> &str {
        &self.document
    }

    /// Write a scalar into a placeholder.
    ///
    /// `None` is a no-op: the marker stays byte-identical so later passes
    /// never see corrupted structure. An absent name is an error, contained
    /// by the caller's section scope.
    pub fn set_value(&mut self, key: &TemplateKey, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let marker = key.marker();
        if !self.document.contains(&marker) {
            return Err(DocxError::UnknownPlaceholder(key.to_string()));
        }
        let replacement = text_run_content(value);
        self.document = self.document.replace(&marker, &replacement);
        Ok(())
    }

    /// Duplicate the block between `${name}` and `${/name}` marker
    /// paragraphs `count` times.
    ///
    /// Every macro inside clone `i` (including nested block markers) gets
    /// `#i` appended. `count == 0` removes the region and both markers.
    /// Marker paragraphs never survive.
    pub fn clone_block(&mut self, key: &TemplateKey, count: usize) -> Result<()> {
        let open = key.marker();
        let close = format!("${{/{}}}", key);

        let open_pos = self
            .document
            .find(&open)
            .ok_or_else(|| DocxError::UnknownBlock(key.to_string()))?;
        let close_pos = self.document[open_pos..]
            .find(&close)
            .map(|p| p + open_pos)
            .ok_or_else(|| DocxError::UnknownBlock(format!("/{}", key)))?;

        let (open_start, open_end) = enclosing_element(&self.document, open_pos, "w:p")
            .ok_or_else(|| DocxError::UnknownBlock(key.to_string()))?;
        let (close_start, close_end) = enclosing_element(&self.document, close_pos, "w:p")
            .ok_or_else(|| DocxError::UnknownBlock(format!("/{}", key)))?;

        let inner = self.document[open_end..close_start].to_string();
        let mut replacement = String::with_capacity(inner.len() * count);
        for i in 1..=count {
            replacement.push_str(&index_macros(&inner, i));
        }
        self.document
            .replace_range(open_start..close_end, &replacement);

        debug!(block = %key, count, "Block cloned");
        Ok(())
    }

    /// Duplicate the table row containing `${name}` `count` times.
    ///
    /// Same indexing contract as [`clone_block`](Self::clone_block);
    /// `count == 0` deletes the row.
    pub fn clone_row(&mut self, key: &TemplateKey, count: usize) -> Result<()> {
        let marker = key.marker();
        let pos = self
            .document
            .find(&marker)
            .ok_or_else(|| DocxError::UnknownBlock(key.to_string()))?;
        let (row_start, row_end) = enclosing_element(&self.document, pos, "w:tr")
            .ok_or_else(|| DocxError::UnknownBlock(key.to_string()))?;

        let row = self.document[row_start..row_end].to_string();
        let mut replacement = String::with_capacity(row.len() * count);
        for i in 1..=count {
            replacement.push_str(&index_macros(&row, i));
        }
        self.document.replace_range(row_start..row_end, &replacement);

        debug!(row = %key, count, "Row cloned");
        Ok(())
    }

    /// Replace a placeholder with embedded binary image data.
    ///
    /// The image is probed for format and natural size, stored as a media
    /// part and anchored with an inline drawing at 96 dpi. Corrupt or
    /// unsupported bytes fail without touching the document.
    pub fn set_image_value(&mut self, key: &TemplateKey, bytes: &[u8]) -> Result<()> {
        let format = image::guess_format(bytes)?;
        let extension = match format {
            image::ImageFormat::Png => "png",
            image::ImageFormat::Jpeg => "jpeg",
            other => {
                return Err(DocxError::UnsupportedImageFormat(format!("{:?}", other)));
            }
        };
        let (width, height) = image::load_from_memory(bytes)?.dimensions();

        let marker = key.marker();
        let pos = self
            .document
            .find(&marker)
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;
        let (run_start, run_end) = enclosing_element(&self.document, pos, "w:r")
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;

        let number = self.next_image;
        self.next_image += 1;
        let part_name = format!("word/media/image{}.{}", number, extension);
        let mime = match extension {
            "png" => "image/png",
            _ => "image/jpeg",
        };
        self.package.ensure_default_content_type(extension, mime)?;
        let rel_id = self
            .package
            .add_document_relationship(IMAGE_REL_TYPE, &format!("media/image{}.{}", number, extension))?;
        self.package.set_part(part_name.clone(), bytes.to_vec());

        let drawing_id = self.next_drawing_id;
        self.next_drawing_id += 1;
        let run = inline_image_run(
            drawing_id,
            &key.to_string(),
            &rel_id,
            u64::from(width) * 9525,
            u64::from(height) * 9525,
        );
        self.document.replace_range(run_start..run_end, &run);

        debug!(placeholder = %key, part = %part_name, width, height, "Image embedded");
        Ok(())
    }

    /// Replace the paragraph holding a marker with a pre-built fragment.
    ///
    /// The fragment's internal styling is opaque to the processor.
    pub fn set_complex_fragment(&mut self, key: &TemplateKey, fragment: &Fragment) -> Result<()> {
        let marker = key.marker();
        let pos = self
            .document
            .find(&marker)
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;
        let (start, end) = enclosing_element(&self.document, pos, "w:p")
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;
        self.document.replace_range(start..end, fragment.as_xml());
        Ok(())
    }

    /// Replace the paragraph holding a marker with an embedded chart.
    ///
    /// Stores the chart part, registers its content-type override and
    /// relationship, and anchors it with an inline drawing.
    pub fn set_chart(&mut self, key: &TemplateKey, chart: &ChartFragment) -> Result<()> {
        let marker = key.marker();
        let pos = self
            .document
            .find(&marker)
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;
        let (start, end) = enclosing_element(&self.document, pos, "w:p")
            .ok_or_else(|| DocxError::UnknownPlaceholder(key.to_string()))?;

        let number = self.next_chart;
        self.next_chart += 1;
        let part_name = format!("word/charts/chart{}.xml", number);
        self.package
            .add_override_content_type(&part_name, CHART_CONTENT_TYPE)?;
        let rel_id = self
            .package
            .add_document_relationship(CHART_REL_TYPE, &format!("charts/chart{}.xml", number))?;
        self.package
            .set_part(part_name.clone(), chart.part_xml.clone().into_bytes());

        let drawing_id = self.next_drawing_id;
        self.next_drawing_id += 1;
        let paragraph = chart_anchor_paragraph(
            drawing_id,
            &chart.name,
            &rel_id,
            chart.width_emu,
            chart.height_emu,
        );
        self.document.replace_range(start..end, &paragraph);

        debug!(placeholder = %key, part = %part_name, "Chart embedded");
        Ok(())
    }

    /// Set the update-fields flag so Word refreshes TOC entries on open.
    pub fn set_update_fields(&mut self) -> Result<()> {
        self.package.set_update_fields()
    }

    /// Serialize the template state back into DOCX bytes.
    pub fn save(mut self) -> Result<Vec<u8>> {
        self.package
            .set_part(DOCUMENT_PART, self.document.into_bytes());
        self.package.save()
    }
}

/// Merge `${...}` spans that the editor split across runs.
///
/// Word freely fragments placeholder text over `<w:r>`/`<w:t>` boundaries
/// (spell-check attributes, formatting churn). This pass rebuilds any macro
/// whose characters are interleaved with markup so later passes can match
/// markers verbatim.
fn fix_broken_macros(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let span = &rest[start..];

        match repair_macro_span(span) {
            Some((clean, consumed)) => {
                out.push_str(&clean);
                rest = &span[consumed..];
            }
            None => {
                out.push_str("${");
                rest = &span[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Try to read one macro starting at `span` (which begins with `${`),
/// skipping any XML tags inside. Returns the cleaned macro text and the
/// number of bytes consumed, or `None` when no well-formed macro is found.
fn repair_macro_span(span: &str) -> Option<(String, usize)> {
    let mut clean = String::from("${");
    let mut in_tag = false;

    for (offset, ch) in span.char_indices().skip(2) {
        if offset > MACRO_SCAN_LIMIT {
            return None;
        }
        match ch {
            '<' if !in_tag => in_tag = true,
            '>' if in_tag => in_tag = false,
            '}' if !in_tag => {
                clean.push('}');
                if is_macro_text(&clean) {
                    return Some((clean, offset + 1));
                }
                return None;
            }
            '$' if !in_tag => return None,
            _ if !in_tag => clean.push(ch),
            _ => {}
        }
    }
    None
}

/// Whether `text` (including the `${`/`}` delimiters) is a plausible macro.
fn is_macro_text(text: &str) -> bool {
    let body = &text[2..text.len() - 1];
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '#' | '/'))
}

/// Append `#index` to every macro in `xml`.
///
/// Closing block markers are indexed too (`${/inner}` → `${/inner#2}`), so
/// a nested clone pass can address the pair by its indexed name.
fn index_macros(xml: &str, index: usize) -> String {
    let suffix = format!("#{}", index);
    let mut out = String::with_capacity(xml.len() + 64);
    let mut rest = xml;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(close) if is_macro_text(&rest[start..start + 2 + close + 1]) => {
                out.push_str(&rest[..start + 2 + close]);
                out.push_str(&suffix);
                out.push('}');
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Find the element of type `tag` (e.g. `w:p`) enclosing byte `pos`.
///
/// Returns the byte range from the opening `<tag` through the closing
/// `</tag>`. Element names sharing the prefix (`w:pPr` for `w:p`) are
/// skipped by checking the boundary character.
fn enclosing_element(xml: &str, pos: usize, tag: &str) -> Option<(usize, usize)> {
    let open_prefix = format!("<{}", tag);
    let close_tag = format!("</{}>", tag);

    let mut search_end = pos;
    let start = loop {
        let candidate = xml[..search_end].rfind(&open_prefix)?;
        let boundary = xml.as_bytes().get(candidate + open_prefix.len());
        match boundary {
            Some(b' ') | Some(b'>') | Some(b'/') => break candidate,
            _ => search_end = candidate,
        }
    };

    let close = xml[pos..].find(&close_tag)? + pos;
    Some((start, close + close_tag.len()))
}

/// Escaped placeholder replacement, with newlines as explicit breaks.
///
/// The value lands inside a `<w:t>` element; line breaks have to close the
/// text run and reopen it after a `<w:br/>`.
fn text_run_content(value: &str) -> String {
    let escaped = crate::fragment::xml_escape(value);
    if !escaped.contains('\n') {
        return escaped;
    }
    escaped.replace('\n', "</w:t><w:br/><w:t xml:space=\"preserve\">")
}

/// Highest existing `prefixN` part number plus one.
fn next_media_number(package: &DocxPackage, prefix: &str) -> usize {
    // Part names are not enumerable through the public API on purpose;
    // probe by name instead.
    let mut n = 1;
    loop {
        let exists = ["png", "jpeg", "jpg", "xml"]
            .iter()
            .any(|ext| package.has_part(&format!("{}{}.{}", prefix, n, ext)));
        if !exists {
            return n;
        }
        n += 1;
    }
}

fn inline_image_run(id: usize, name: &str, rel_id: &str, cx: u64, cy: u64) -> String {
    format!(
        concat!(
            "<w:r><w:drawing>",
            "<wp:inline xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:effectExtent l=\"0\" t=\"0\" r=\"0\" b=\"0\"/>",
            "<wp:docPr id=\"{id}\" name=\"{name}\"/>",
            "<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>",
            "<a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">",
            "<a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            "<pic:blipFill><a:blip xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>",
            "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>",
            "</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"
        ),
        id = id,
        name = crate::fragment::xml_escape(name),
        rel = rel_id,
        cx = cx,
        cy = cy,
    )
}

fn chart_anchor_paragraph(id: usize, name: &str, rel_id: &str, cx: u64, cy: u64) -> String {
    format!(
        concat!(
            "<w:p><w:r><w:drawing>",
            "<wp:inline xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:docPr id=\"{id}\" name=\"{name}\"/>",
            "<a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">",
            "<a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/chart\">",
            "<c:chart xmlns:c=\"http://schemas.openxmlformats.org/drawingml/2006/chart\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" r:id=\"{rel}\"/>",
            "</a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"
        ),
        id = id,
        name = crate::fragment::xml_escape(name),
        rel = rel_id,
        cx = cx,
        cy = cy,
    )
}
