//! Resolved report data supplied by the upstream collector.
//!
//! The engine never fetches anything itself: every collection and scalar
//! arrives fully resolved, and absent values stay `None` so the template
//! keeps its markers untouched.

use crate::{ImageRef, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to fill one report template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportData {
    /// Report generation date, preformatted (`YYYY-MM-DD`).
    pub date: String,
    /// Project under test.
    pub project: Project,
    /// Client the project belongs to, if any.
    pub client: Option<Client>,
    /// Organisation issuing the report.
    pub org: Organisation,
    /// In-scope targets.
    pub targets: Vec<Target>,
    /// Project team members.
    pub users: Vec<User>,
    /// Client/organisation contacts.
    pub contacts: Vec<Contact>,
    /// Shared credential/vault entries.
    pub vault_items: Vec<VaultItem>,
    /// Findings, in presentation order.
    pub vulnerabilities: Vec<Vulnerability>,
    /// Top-level vulnerability categories.
    pub parent_categories: Vec<VulnerabilityCategory>,
    /// Child vulnerability categories.
    pub categories: Vec<VulnerabilityCategory>,
    /// Prior report versions, newest first.
    pub report_history: Vec<ReportRevision>,
    /// Named logo slots (`org.logo`, `client.small_logo`, ...).
    pub logos: BTreeMap<String, ImageRef>,
}

/// Project scalars plus its image attachments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Markdown description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown management summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_summary: Option<String>,
    /// Markdown management conclusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_conclusion: Option<String>,
    /// Engagement start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_start_date: Option<String>,
    /// Engagement end date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_end_date: Option<String>,
    /// Image attachments embedded in the appendix block.
    #[serde(default)]
    pub attachments: Vec<ImageRef>,
}

/// Client scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    /// Client name.
    pub name: String,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Client URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Organisation issuing the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organisation {
    /// Organisation name.
    pub name: String,
    /// Organisation URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// In-scope target host or asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Hostname, IP or asset name.
    pub name: String,
    /// Target kind (hostname, ip, url, ...).
    pub kind: String,
}

/// Project team member shown in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub full_name: String,
    /// One-paragraph bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_bio: Option<String>,
}

/// Contact listed in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Contact kind (technical, billing, ...).
    pub kind: String,
    /// Contact name.
    pub name: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role within the client organisation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Credential/vault entry disclosed in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultItem {
    /// Entry name.
    pub name: String,
    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Entry type (password, token, ...).
    #[serde(rename = "type")]
    pub item_type: String,
}

/// Vulnerability category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityCategory {
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Prior report version for the revision-history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRevision {
    /// When the revision was created.
    pub insert_ts: DateTime<Utc>,
    /// Version name (e.g. `1.2`).
    pub version_name: String,
    /// Version description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_description: Option<String>,
}

/// A single finding.
///
/// All free-text fields are markdown; `None` means the placeholder stays
/// untouched in the template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vulnerability {
    /// One-line summary, used as the finding title.
    pub summary: String,
    /// Markdown description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown remediation advice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Markdown proof of concept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_of_concept: Option<String>,
    /// Markdown impact statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Markdown external references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_refs: Option<String>,
    /// Category name, already resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// CVSS base score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,
    /// CVSS vector string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_vector: Option<String>,
    /// OWASP risk-rating vector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owasp_vector: Option<String>,
    /// Risk rating; drives the severity banner and overview counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<Severity>,
    /// Remediation complexity rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_complexity: Option<String>,
    /// Remediation priority rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_priority: Option<String>,
    /// Image attachments embedded under this finding.
    #[serde(default)]
    pub attachments: Vec<ImageRef>,
}

impl Vulnerability {
    /// Create a vulnerability with a summary and everything else empty.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }
}
