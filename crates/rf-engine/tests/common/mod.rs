//! Shared fixtures: an in-memory DOCX template covering every report
//! section, plus fully populated sample data.

use chrono::{TimeZone, Utc};
use rf_model::{
    Client, Contact, ImageRef, Organisation, Project, ReportData, ReportRevision, Severity,
    Target, User, VaultItem, Vulnerability, VulnerabilityCategory,
};
use std::io::{Cursor, Read, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

/// Canonical 1x1 transparent PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
}

fn table(cells: &[&str]) -> String {
    let row: String = cells
        .iter()
        .map(|cell| format!("<w:tc>{}</w:tc>", paragraph(cell)))
        .collect();
    format!("<w:tbl><w:tr>{}</w:tr></w:tbl>", row)
}

/// Template body holding every marker, optionally without the vault-item
/// row so one section can be made to fail.
pub fn template_body(with_vault_items: bool) -> String {
    let mut body = String::new();
    body.push_str(&paragraph("${date}"));
    body.push_str(&paragraph("${project.name}"));
    body.push_str(&paragraph("${project.description}"));
    body.push_str(&paragraph("${project.management_summary}"));
    body.push_str(&paragraph("${project.management_conclusion}"));
    body.push_str(&paragraph(
        "${project.engagement_start_date} ${project.engagement_end_date}",
    ));
    body.push_str(&paragraph("${client.name}"));
    body.push_str(&paragraph("${client.address} ${client.url}"));
    body.push_str(&paragraph("${org.name} ${org.url} ${org.email}"));
    body.push_str(&paragraph("${org.logo}"));
    body.push_str(&paragraph("${project.attachments}"));
    body.push_str(&paragraph("${project.attachment.image}"));
    body.push_str(&paragraph("${/project.attachments}"));
    body.push_str(&table(&["${user.full_name}", "${user.short_bio}"]));
    if with_vault_items {
        body.push_str(&table(&[
            "${vaultItem.name}",
            "${vaultItem.type}",
            "${vaultItem.note}",
        ]));
    }
    body.push_str(&table(&["${target.name}", "${target.kind}"]));
    body.push_str(&paragraph(
        "${findings.count.low} ${findings.count.medium} ${findings.count.high} ${findings.count.critical}",
    ));
    body.push_str(&paragraph("${findings.chart}"));
    body.push_str(&paragraph("${vulnerabilities}"));
    body.push_str(&paragraph("${vulnerability.name}"));
    body.push_str(&paragraph("${vulnerability.description}"));
    body.push_str(&paragraph("${vulnerability.proof_of_concept}"));
    body.push_str(&paragraph("${vulnerability.remediation}"));
    body.push_str(&paragraph("${vulnerability.impact}"));
    body.push_str(&paragraph("${vulnerability.external_refs}"));
    body.push_str(&paragraph(
        "${vulnerability.category_name} ${vulnerability.cvss_score} ${vulnerability.cvss_vector}",
    ));
    body.push_str(&paragraph(
        "${vulnerability.owasp_vector} ${vulnerability.severity}",
    ));
    body.push_str(&paragraph(
        "${vulnerability.remediation_complexity} ${vulnerability.remediation_priority}",
    ));
    body.push_str(&paragraph("${vulnerability.attachments}"));
    body.push_str(&paragraph("${vulnerability.attachment.image}"));
    body.push_str(&paragraph("${/vulnerability.attachments}"));
    body.push_str(&paragraph("${/vulnerabilities}"));
    body.push_str(&table(&[
        "${summary.name}",
        "${summary.category_name}",
        "${summary.severity}",
        "${summary.cvss_score}",
    ]));
    body.push_str(&table(&[
        "${contact.kind}",
        "${contact.name}",
        "${contact.phone}",
        "${contact.email}",
        "${contact.role}",
    ]));
    body.push_str(&table(&[
        "${parentCategory.name}",
        "${parentCategory.description}",
    ]));
    body.push_str(&table(&["${category.name}", "${category.description}"]));
    body.push_str(&table(&[
        "${revisionHistoryDateTime}",
        "${revisionHistoryVersionName}",
        "${revisionHistoryVersionDescription}",
    ]));
    body
}

/// DOCX bytes for a template with the given body.
pub fn template_bytes(body: &str) -> Vec<u8> {
    let document = format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" ",
            "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
            "<w:body>{}</w:body></w:document>"
        ),
        body
    );

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options: FileOptions<'_, ()> = FileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(RELS.as_bytes()).unwrap();
        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(RELS.as_bytes()).unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buffer.into_inner()
}

/// A template containing every marker.
pub fn full_template() -> Vec<u8> {
    template_bytes(&template_body(true))
}

/// Extract `word/document.xml` from finished DOCX bytes.
pub fn document_xml(docx: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut entry = archive.by_name("word/document.xml").unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

/// Part names in finished DOCX bytes.
pub fn part_names(docx: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(docx)).unwrap();
    archive.file_names().map(String::from).collect()
}

/// Report data filling every marker in [`full_template`].
pub fn sample_data() -> ReportData {
    let mut vuln_sqli = Vulnerability::new("SQL injection in login form");
    vuln_sqli.description = Some("Unsanitized `username` parameter.".to_string());
    vuln_sqli.proof_of_concept = Some("```\n' OR 1=1 --\n```".to_string());
    vuln_sqli.remediation = Some("Use prepared statements.".to_string());
    vuln_sqli.impact = Some("Full database read access.".to_string());
    vuln_sqli.external_refs = Some("CWE-89".to_string());
    vuln_sqli.category_name = Some("Injection".to_string());
    vuln_sqli.cvss_score = Some(9.1);
    vuln_sqli.cvss_vector = Some("CVSS:3.1/AV:N/AC:L".to_string());
    vuln_sqli.owasp_vector = Some("A03:2021".to_string());
    vuln_sqli.risk = Some(Severity::High);
    vuln_sqli.remediation_complexity = Some("low".to_string());
    vuln_sqli.remediation_priority = Some("high".to_string());
    vuln_sqli.attachments = vec![ImageRef::Bytes(PNG_1X1.to_vec())];

    let mut vuln_header = Vulnerability::new("Missing security headers");
    vuln_header.description = Some("No `X-Frame-Options` header.".to_string());
    vuln_header.proof_of_concept = Some("curl -I https://example.test".to_string());
    vuln_header.remediation = Some("Add the header.".to_string());
    vuln_header.impact = Some("Clickjacking.".to_string());
    vuln_header.external_refs = Some("CWE-1021".to_string());
    vuln_header.category_name = Some("Configuration".to_string());
    vuln_header.cvss_score = Some(3.1);
    vuln_header.cvss_vector = Some("CVSS:3.1/AV:N/AC:H".to_string());
    vuln_header.owasp_vector = Some("A05:2021".to_string());
    vuln_header.risk = Some(Severity::Low);
    vuln_header.remediation_complexity = Some("low".to_string());
    vuln_header.remediation_priority = Some("low".to_string());

    ReportData {
        date: "2026-08-25".to_string(),
        project: Project {
            name: "Pentest Façade".to_string(),
            description: Some("External perimeter review.".to_string()),
            management_summary: Some("**Two** findings.".to_string()),
            management_conclusion: Some("Retest advised.".to_string()),
            engagement_start_date: Some("2026-08-01".to_string()),
            engagement_end_date: Some("2026-08-20".to_string()),
            attachments: vec![ImageRef::Bytes(PNG_1X1.to_vec())],
        },
        client: Some(Client {
            name: "Ácme Co".to_string(),
            address: Some("1 Main St".to_string()),
            url: Some("https://acme.test".to_string()),
        }),
        org: Organisation {
            name: "Issuer Ltd".to_string(),
            url: Some("https://issuer.test".to_string()),
            email: Some("reports@issuer.test".to_string()),
        },
        targets: vec![
            Target {
                name: "gateway.acme.test".to_string(),
                kind: "hostname".to_string(),
            },
            Target {
                name: "10.0.0.7".to_string(),
                kind: "ip".to_string(),
            },
        ],
        users: vec![User {
            full_name: "Jamie Tester".to_string(),
            short_bio: Some("Lead pentester.".to_string()),
        }],
        contacts: vec![Contact {
            kind: "technical".to_string(),
            name: "Robin Ops".to_string(),
            phone: Some("+1 555 0100".to_string()),
            email: Some("robin@acme.test".to_string()),
            role: Some("sysadmin".to_string()),
        }],
        vault_items: vec![VaultItem {
            name: "db password".to_string(),
            note: Some("rotated after test".to_string()),
            item_type: "password".to_string(),
        }],
        vulnerabilities: vec![vuln_sqli, vuln_header],
        parent_categories: vec![VulnerabilityCategory {
            name: "Web".to_string(),
            description: Some("Web application issues".to_string()),
        }],
        categories: vec![VulnerabilityCategory {
            name: "Injection".to_string(),
            description: Some("Interpreter injection".to_string()),
        }],
        report_history: vec![ReportRevision {
            insert_ts: Utc.with_ymd_and_hms(2026, 8, 20, 14, 30, 0).unwrap(),
            version_name: "1.0".to_string(),
            version_description: Some("Initial draft".to_string()),
        }],
        logos: [("org.logo".to_string(), ImageRef::Bytes(PNG_1X1.to_vec()))]
            .into_iter()
            .collect(),
    }
}
