//! Render configuration.

/// Settings for a report generation run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Host identifier prefixed to the storage filename so concurrent
    /// renders on different hosts never collide.
    pub host_id: String,
    /// Ask the word processor to refresh field results (TOC page numbers)
    /// when the document is first opened.
    pub update_fields: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            host_id: "report".to_string(),
            update_fields: true,
        }
    }
}

impl RenderConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host identifier.
    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = host_id.into();
        self
    }

    /// Enable or disable the update-fields flag.
    pub fn with_update_fields(mut self, update_fields: bool) -> Self {
        self.update_fields = update_fields;
        self
    }
}
