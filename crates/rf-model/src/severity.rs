//! Severity levels and their fixed presentation styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vulnerability severity, in ascending enumeration order.
///
/// The enumeration order doubles as the tie-break order for the findings
/// overview sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

impl Severity {
    /// All severities in enumeration order.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Fixed presentation style for this severity.
    ///
    /// Not configurable at call time: consumed by the severity banner and
    /// the findings chart bar colors.
    pub fn style(&self) -> SeverityStyle {
        match self {
            Severity::Low => SeverityStyle {
                fill: "fbc800",
                text: "ffffff",
            },
            Severity::Medium => SeverityStyle {
                fill: "db732e",
                text: "ffffff",
            },
            Severity::High => SeverityStyle {
                fill: "d42820",
                text: "ffffff",
            },
            Severity::Critical => SeverityStyle {
                fill: "000000",
                text: "ffffff",
            },
        }
    }

    /// Lowercase name, matching the template placeholder suffixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Error for severity strings outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity: {}", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

/// Color pair for a severity: cell fill and complementary text color.
///
/// Hex RGB without the leading `#`, as WordprocessingML expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    /// Background/fill color.
    pub fill: &'static str,
    /// Text color (white across the whole table).
    pub text: &'static str,
}

/// Per-severity finding count for the overview section and chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsCount {
    /// Severity bucket.
    pub severity: Severity,
    /// Number of vulnerabilities with that risk.
    pub count: usize,
}

/// Compute the findings overview from a vulnerability list.
///
/// Counts each of the four fixed severities, then sorts descending by
/// count with ties broken by severity descending, so `high:2, critical:1,
/// low:1, medium:0` comes out in exactly that order. Vulnerabilities
/// without a risk rating are not counted.
pub fn findings_overview(vulnerabilities: &[crate::Vulnerability]) -> Vec<FindingsCount> {
    let mut overview: Vec<FindingsCount> = Severity::ALL
        .iter()
        .map(|&severity| FindingsCount {
            severity,
            count: vulnerabilities
                .iter()
                .filter(|v| v.risk == Some(severity))
                .count(),
        })
        .collect();
    overview.sort_by(|a, b| b.count.cmp(&a.count).then(b.severity.cmp(&a.severity)));
    overview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vulnerability;

    fn vuln(risk: Option<Severity>) -> Vulnerability {
        Vulnerability {
            risk,
            ..Vulnerability::new("test")
        }
    }

    #[test]
    fn test_severity_roundtrip() {
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
        assert!("informational".parse::<Severity>().is_err());
    }

    #[test]
    fn test_style_table_fixed() {
        assert_eq!(Severity::Low.style().fill, "fbc800");
        assert_eq!(Severity::Medium.style().fill, "db732e");
        assert_eq!(Severity::High.style().fill, "d42820");
        assert_eq!(Severity::Critical.style().fill, "000000");
        for severity in Severity::ALL {
            assert_eq!(severity.style().text, "ffffff");
        }
    }

    #[test]
    fn test_findings_overview_sorted_desc() {
        let vulns = vec![
            vuln(Some(Severity::High)),
            vuln(Some(Severity::Low)),
            vuln(Some(Severity::High)),
            vuln(Some(Severity::Critical)),
        ];
        let overview = findings_overview(&vulns);
        let expected = [
            (Severity::High, 2),
            (Severity::Critical, 1),
            (Severity::Low, 1),
            (Severity::Medium, 0),
        ];
        let actual: Vec<_> = overview.iter().map(|f| (f.severity, f.count)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_findings_overview_unrated_not_counted() {
        let vulns = vec![vuln(None), vuln(Some(Severity::Medium))];
        let overview = findings_overview(&vulns);
        let total: usize = overview.iter().map(|f| f.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_findings_overview_empty() {
        let overview = findings_overview(&[]);
        assert_eq!(overview.len(), 4);
        assert!(overview.iter().all(|f| f.count == 0));
        // All-zero ties fall back to severity descending.
        let order: Vec<_> = overview.iter().map(|f| f.severity).collect();
        assert_eq!(
            order,
            vec![
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low
            ]
        );
    }
}
