//! Top-level report generation.

use crate::artifact::GeneratedArtifact;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::sections::{run_sections, SectionFailure};
use rf_docx::TemplateProcessor;
use rf_model::ReportData;
use std::path::Path;
use tracing::info;

/// Result of one render: the artifact plus any contained section failures.
#[derive(Debug)]
pub struct RenderOutput {
    /// The finished document.
    pub artifact: GeneratedArtifact,
    /// Sections that failed and were skipped.
    pub failures: Vec<SectionFailure>,
}

/// Renders report templates into finished documents.
///
/// One synchronous pass per call: open the template, run every section in
/// order (containing per-section failures), flush to bytes, wrap as an
/// artifact. Only open/save problems abort a render; a partially failed
/// document is still produced in full.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    config: RenderConfig,
}

impl ReportGenerator {
    /// Create a generator with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a template file.
    pub fn generate_from_path(
        &self,
        template_path: &Path,
        data: &ReportData,
        version_name: &str,
    ) -> Result<RenderOutput> {
        self.generate(TemplateProcessor::open(template_path)?, data, version_name)
    }

    /// Render template bytes.
    pub fn generate_from_bytes(
        &self,
        template: Vec<u8>,
        data: &ReportData,
        version_name: &str,
    ) -> Result<RenderOutput> {
        self.generate(TemplateProcessor::from_bytes(template)?, data, version_name)
    }

    fn generate(
        &self,
        mut template: TemplateProcessor,
        data: &ReportData,
        version_name: &str,
    ) -> Result<RenderOutput> {
        if self.config.update_fields {
            template.set_update_fields()?;
        }

        let failures = run_sections(&mut template, data);
        let bytes = template.save()?;

        let client_name = data
            .client
            .as_ref()
            .map(|client| client.name.as_str())
            .unwrap_or(&data.org.name);
        let artifact = GeneratedArtifact::new(
            bytes,
            &self.config.host_id,
            client_name,
            &data.project.name,
            version_name,
        );
        info!(
            file = %artifact.file_name,
            client_file = %artifact.client_file_name,
            bytes = artifact.byte_size,
            failed_sections = failures.len(),
            "Report generated"
        );
        Ok(RenderOutput { artifact, failures })
    }
}
