//! Report data model for the document rendering pipeline.
//!
//! The model is supplied fully resolved by an upstream data collector and
//! is read-only to the engine: scalar fields, variable-length collections
//! (targets, users, vulnerabilities, ...) and opaque image handles.
//!
//! # Severity
//!
//! Vulnerability risk levels carry a fixed color style table used for the
//! severity banner and the findings chart; see [`Severity`].

pub mod image;
pub mod report;
pub mod severity;

pub use image::ImageRef;
pub use report::{
    Client, Contact, Organisation, Project, ReportData, ReportRevision, Target, User,
    VaultItem, Vulnerability, VulnerabilityCategory,
};
pub use severity::{findings_overview, FindingsCount, Severity, SeverityStyle};
