//! DOCX package reader/writer.
//!
//! A `.docx` file is a ZIP of OOXML parts. The package keeps every part in
//! memory, tracks content types and document relationships for added media,
//! and writes the archive back with deterministic part ordering.

use crate::{DocxError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// Part name of the main document.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Part name of the content types manifest.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Part name of the document relationships.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Part name of the document settings.
pub const SETTINGS_PART: &str = "word/settings.xml";

const RELS_EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

const SETTINGS_EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"></w:settings>"#;

/// In-memory DOCX package.
#[derive(Debug)]
pub struct DocxPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl DocxPackage {
    /// Open a package from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Open a package from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open a package from any `Read + Seek` source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_string(), data);
        }

        let package = Self { parts };
        for required in [CONTENT_TYPES_PART, DOCUMENT_PART] {
            if !package.parts.contains_key(required) {
                return Err(DocxError::MissingPart(required.to_string()));
            }
        }

        debug!(parts = package.parts.len(), "Package opened");
        Ok(package)
    }

    /// Get a part's bytes.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Whether the package contains a part.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Insert or replace a part.
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(name.into(), data);
    }

    /// Read a part as UTF-8 text.
    pub fn text_part(&self, name: &str) -> Result<String> {
        let data = self
            .parts
            .get(name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))?;
        String::from_utf8(data.clone()).map_err(|_| DocxError::InvalidPart {
            part: name.to_string(),
        })
    }

    /// Ensure a `<Default>` content type for a file extension.
    pub fn ensure_default_content_type(&mut self, extension: &str, mime: &str) -> Result<()> {
        let mut manifest = self.text_part(CONTENT_TYPES_PART)?;
        let needle = format!("Extension=\"{}\"", extension);
        if manifest.contains(&needle) {
            return Ok(());
        }
        let entry = format!(
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            extension, mime
        );
        insert_before(&mut manifest, "</Types>", &entry)
            .ok_or_else(|| DocxError::MissingPart(CONTENT_TYPES_PART.to_string()))?;
        self.set_part(CONTENT_TYPES_PART, manifest.into_bytes());
        Ok(())
    }

    /// Register an `<Override>` content type for a specific part.
    pub fn add_override_content_type(&mut self, part_name: &str, mime: &str) -> Result<()> {
        let mut manifest = self.text_part(CONTENT_TYPES_PART)?;
        let needle = format!("PartName=\"/{}\"", part_name);
        if manifest.contains(&needle) {
            return Ok(());
        }
        let entry = format!(
            "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
            part_name, mime
        );
        insert_before(&mut manifest, "</Types>", &entry)
            .ok_or_else(|| DocxError::MissingPart(CONTENT_TYPES_PART.to_string()))?;
        self.set_part(CONTENT_TYPES_PART, manifest.into_bytes());
        Ok(())
    }

    /// Add a relationship from the main document, returning the new `rId`.
    pub fn add_document_relationship(&mut self, type_uri: &str, target: &str) -> Result<String> {
        let mut rels = if self.has_part(DOCUMENT_RELS_PART) {
            self.text_part(DOCUMENT_RELS_PART)?
        } else {
            RELS_EMPTY.to_string()
        };

        let id = format!("rId{}", next_relationship_number(&rels));
        let entry = format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
            id, type_uri, target
        );
        insert_before(&mut rels, "</Relationships>", &entry)
            .ok_or_else(|| DocxError::InvalidPart {
                part: DOCUMENT_RELS_PART.to_string(),
            })?;
        self.set_part(DOCUMENT_RELS_PART, rels.into_bytes());

        debug!(id = %id, target, "Relationship added");
        Ok(id)
    }

    /// Set `<w:updateFields/>` so Word refreshes TOC and fields on open.
    pub fn set_update_fields(&mut self) -> Result<()> {
        let mut settings = if self.has_part(SETTINGS_PART) {
            self.text_part(SETTINGS_PART)?
        } else {
            self.add_override_content_type(
                SETTINGS_PART,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
            )?;
            self.add_document_relationship(
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings",
                "settings.xml",
            )?;
            SETTINGS_EMPTY.to_string()
        };

        if !settings.contains("<w:updateFields") {
            let entry = "<w:updateFields w:val=\"true\"/>";
            // Insert right after the opening <w:settings ...> tag.
            if let Some(open_end) = settings
                .find("<w:settings")
                .and_then(|start| settings[start..].find('>').map(|off| start + off + 1))
            {
                settings.insert_str(open_end, entry);
            }
            self.set_part(SETTINGS_PART, settings.into_bytes());
        }
        Ok(())
    }

    /// Serialize the package back to DOCX bytes.
    ///
    /// Parts are written in sorted name order so identical content always
    /// produces identical archives.
    pub fn save(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options: FileOptions<'_, ()> = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);

            for (name, data) in &self.parts {
                zip.start_file(name.as_str(), options)?;
                zip.write_all(data)?;
            }
            zip.finish()?;
        }

        let bytes = buffer.into_inner();
        info!(
            parts = self.parts.len(),
            bytes = bytes.len(),
            "Package serialized"
        );
        Ok(bytes)
    }
}

/// Insert `entry` immediately before the first occurrence of `anchor`.
fn insert_before(text: &mut String, anchor: &str, entry: &str) -> Option<()> {
    let pos = text.find(anchor)?;
    text.insert_str(pos, entry);
    Some(())
}

/// Next free numeric suffix for `rIdN` identifiers.
fn next_relationship_number(rels: &str) -> usize {
    let mut max = 0usize;
    let mut rest = rels;
    while let Some(pos) = rest.find("Id=\"rId") {
        rest = &rest[pos + 7..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(n) = digits.parse::<usize>() {
            max = max.max(n);
        }
    }
    max + 1
}
