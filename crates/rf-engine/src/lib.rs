//! Report generation engine.
//!
//! Orchestrates a full render: a resolved [`ReportData`](rf_model::ReportData)
//! plus a DOCX template in, a [`GeneratedArtifact`] out. Sections populate
//! the template in a fixed order with per-section failure isolation, then
//! the document is flushed once and wrapped with its hash, size and
//! filenames.
//!
//! # Example
//!
//! ```no_run
//! use rf_engine::{RenderConfig, ReportGenerator};
//! use rf_model::ReportData;
//! use std::path::Path;
//!
//! let generator = ReportGenerator::new(RenderConfig::new().with_host_id("scanner01"));
//! let data = ReportData::default();
//! let output = generator
//!     .generate_from_path(Path::new("template.docx"), &data, "1.0")
//!     .unwrap();
//! println!("{} ({} bytes)", output.artifact.client_file_name, output.artifact.byte_size);
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod generator;
pub mod sections;

pub use artifact::{sanitize_component, AttachmentRecord, GeneratedArtifact, DOCX_MIME};
pub use config::RenderConfig;
pub use error::{EngineError, Result};
pub use generator::{RenderOutput, ReportGenerator};
pub use sections::{FieldRouting, SectionFailure, PROJECT_FIELDS, SECTIONS, VULNERABILITY_FIELDS};
