//! Rich content rendering for document templates.
//!
//! Converts markdown free text, severity banners and the findings chart
//! into WordprocessingML/DrawingML fragments that `rf-docx` splices into
//! a template. All rendering is total: absent or empty input produces
//! `None` and the caller leaves the placeholder untouched.

pub mod banner;
pub mod chart;
pub mod markdown;
pub mod wordml;

pub use banner::severity_banner;
pub use chart::{column_chart, ChartColumn, CHART_HEIGHT_EMU, CHART_WIDTH_EMU};
pub use markdown::render_markdown;
