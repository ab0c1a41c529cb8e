//! Severity-tagged title banners.

use crate::wordml::{paragraph, run, single_cell_table, RunStyle};
use rf_docx::Fragment;
use rf_model::Severity;

/// Build the colored title banner for a finding.
///
/// A single cell shaded with the severity fill color, holding the
/// vulnerability name in bold white text. Findings without a risk rating
/// get no banner; the caller falls back to a plain scalar write.
pub fn severity_banner(title: &str, severity: Severity) -> Fragment {
    let style = severity.style();
    let content = paragraph(&run(
        title,
        RunStyle {
            bold: true,
            color: Some(style.text),
            ..Default::default()
        },
    ));
    Fragment::from_xml(single_cell_table(&content, None, Some(style.fill)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_uses_severity_colors() {
        let fragment = severity_banner("SQL injection", Severity::High);
        let xml = fragment.as_xml();
        assert!(xml.contains("w:fill=\"d42820\""));
        assert!(xml.contains("w:val=\"ffffff\""));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("SQL injection"));
    }

    #[test]
    fn test_banner_escapes_title() {
        let fragment = severity_banner("a < b", Severity::Low);
        assert!(fragment.as_xml().contains("a &lt; b"));
    }

    #[test]
    fn test_critical_banner_black_fill() {
        let fragment = severity_banner("RCE", Severity::Critical);
        assert!(fragment.as_xml().contains("w:fill=\"000000\""));
    }
}
