//! DOCX template processor.
//!
//! Rewrites OOXML markup in place: scalar placeholder substitution, block
//! and table-row cloning for variable-length collections (with 1-based
//! indexed naming, nestable), binary image embedding, and wholesale
//! replacement of marker paragraphs with pre-built rich-content or chart
//! fragments.
//!
//! # Markers
//!
//! - `${name}` — scalar placeholder
//! - `${name}` ... `${/name}` — repeatable block (marker paragraphs)
//! - `${name}` inside a `<w:tr>` — repeatable table row
//!
//! Clone `i` of a region rewrites every macro inside it to `name#i`;
//! nested regions compose, so the attachment `j` of item `i` reads
//! `item.attachment#i#j`.
//!
//! # Example
//!
//! ```no_run
//! use rf_docx::{TemplateKey, TemplateProcessor};
//! use std::path::Path;
//!
//! let mut template = TemplateProcessor::open(Path::new("report.docx")).unwrap();
//! template.set_value(&TemplateKey::new("date"), Some("2026-08-25")).unwrap();
//! template.clone_row(&TemplateKey::new("target.name"), 3).unwrap();
//! let bytes = template.save().unwrap();
//! ```

pub mod error;
pub mod fragment;
pub mod key;
pub mod package;
pub mod processor;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{DocxError, Result};
pub use fragment::{xml_escape, ChartFragment, Fragment};
pub use key::TemplateKey;
pub use package::DocxPackage;
pub use processor::TemplateProcessor;
