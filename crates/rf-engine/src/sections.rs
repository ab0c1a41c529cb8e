//! Report sections and their population order.
//!
//! Each section fills one logical region of the template. The order is
//! fixed business policy, as is the routing table deciding which fields
//! go through markdown rendering and which are plain scalar writes. A
//! failing section is logged and skipped; later sections still run.

use rf_docx::{TemplateKey, TemplateProcessor};
use rf_model::{findings_overview, Project, ReportData, Vulnerability};
use rf_render::{column_chart, render_markdown, severity_banner, ChartColumn};
use serde::Serialize;
use tracing::warn;

/// Series title of the findings chart.
const FINDINGS_CHART_NAME: &str = "Findings";

/// Revision-history timestamp format.
const REVISION_TS_FORMAT: &str = "%Y-%m-%d %H:%M";

/// How a field's value reaches the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRouting {
    /// Plain scalar substitution.
    Plain,
    /// Markdown rendered to a rich-content fragment.
    Markdown,
}

/// Project fields in write order with their routing.
pub const PROJECT_FIELDS: &[(&str, FieldRouting)] = &[
    ("project.name", FieldRouting::Plain),
    ("project.description", FieldRouting::Markdown),
    ("project.management_summary", FieldRouting::Markdown),
    ("project.management_conclusion", FieldRouting::Markdown),
    ("project.engagement_start_date", FieldRouting::Plain),
    ("project.engagement_end_date", FieldRouting::Plain),
];

/// Per-vulnerability fields in write order with their routing.
pub const VULNERABILITY_FIELDS: &[(&str, FieldRouting)] = &[
    ("vulnerability.description", FieldRouting::Markdown),
    ("vulnerability.proof_of_concept", FieldRouting::Markdown),
    ("vulnerability.remediation", FieldRouting::Markdown),
    ("vulnerability.impact", FieldRouting::Markdown),
    ("vulnerability.external_refs", FieldRouting::Markdown),
    ("vulnerability.category_name", FieldRouting::Plain),
    ("vulnerability.cvss_score", FieldRouting::Plain),
    ("vulnerability.cvss_vector", FieldRouting::Plain),
    ("vulnerability.owasp_vector", FieldRouting::Plain),
    ("vulnerability.severity", FieldRouting::Plain),
    ("vulnerability.remediation_complexity", FieldRouting::Plain),
    ("vulnerability.remediation_priority", FieldRouting::Plain),
];

/// One logical report section.
pub struct Section {
    /// Section name, used in failure records and logs.
    pub name: &'static str,
    run: fn(&mut SectionContext<'_>) -> rf_docx::Result<()>,
}

/// Sections in population order.
pub const SECTIONS: &[Section] = &[
    Section { name: "date", run: run_date },
    Section { name: "project", run: run_project },
    Section { name: "client", run: run_client },
    Section { name: "org", run: run_org },
    Section { name: "project_attachments", run: run_project_attachments },
    Section { name: "users", run: run_users },
    Section { name: "logos", run: run_logos },
    Section { name: "vault_items", run: run_vault_items },
    Section { name: "targets", run: run_targets },
    Section { name: "findings_overview", run: run_findings_overview },
    Section { name: "vulnerabilities", run: run_vulnerabilities },
    Section { name: "summary", run: run_summary },
    Section { name: "contacts", run: run_contacts },
    Section { name: "categories", run: run_categories },
    Section { name: "revision_history", run: run_revision_history },
];

/// A contained section failure.
#[derive(Debug, Clone, Serialize)]
pub struct SectionFailure {
    /// Name of the failed section.
    pub section: &'static str,
    /// Underlying error message.
    pub message: String,
}

struct SectionContext<'a> {
    template: &'a mut TemplateProcessor,
    data: &'a ReportData,
}

/// Run every section in order, containing failures.
///
/// A failure aborts only that section's remaining writes; the error is
/// logged with the section name and recorded, and the next section runs
/// against the template as the failed one left it.
pub fn run_sections(template: &mut TemplateProcessor, data: &ReportData) -> Vec<SectionFailure> {
    let mut failures = Vec::new();
    for section in SECTIONS {
        let mut ctx = SectionContext {
            template: &mut *template,
            data,
        };
        if let Err(error) = (section.run)(&mut ctx) {
            warn!(section = section.name, error = %error, "Report section failed, continuing");
            failures.push(SectionFailure {
                section: section.name,
                message: error.to_string(),
            });
        }
    }
    failures
}

fn write_routed(
    template: &mut TemplateProcessor,
    key: &TemplateKey,
    routing: FieldRouting,
    value: Option<&str>,
) -> rf_docx::Result<()> {
    match routing {
        FieldRouting::Plain => template.set_value(key, value),
        FieldRouting::Markdown => match value.and_then(render_markdown) {
            Some(fragment) => template.set_complex_fragment(key, &fragment),
            None => Ok(()),
        },
    }
}

fn project_field<'a>(project: &'a Project, name: &str) -> Option<&'a str> {
    match name {
        "project.name" => Some(&project.name),
        "project.description" => project.description.as_deref(),
        "project.management_summary" => project.management_summary.as_deref(),
        "project.management_conclusion" => project.management_conclusion.as_deref(),
        "project.engagement_start_date" => project.engagement_start_date.as_deref(),
        "project.engagement_end_date" => project.engagement_end_date.as_deref(),
        _ => None,
    }
}

fn vulnerability_field(vulnerability: &Vulnerability, name: &str) -> Option<String> {
    match name {
        "vulnerability.description" => vulnerability.description.clone(),
        "vulnerability.proof_of_concept" => vulnerability.proof_of_concept.clone(),
        "vulnerability.remediation" => vulnerability.remediation.clone(),
        "vulnerability.impact" => vulnerability.impact.clone(),
        "vulnerability.external_refs" => vulnerability.external_refs.clone(),
        "vulnerability.category_name" => vulnerability.category_name.clone(),
        "vulnerability.cvss_score" => vulnerability.cvss_score.map(|score| score.to_string()),
        "vulnerability.cvss_vector" => vulnerability.cvss_vector.clone(),
        "vulnerability.owasp_vector" => vulnerability.owasp_vector.clone(),
        "vulnerability.severity" => vulnerability.risk.map(|risk| risk.to_string()),
        "vulnerability.remediation_complexity" => vulnerability.remediation_complexity.clone(),
        "vulnerability.remediation_priority" => vulnerability.remediation_priority.clone(),
        _ => None,
    }
}

fn run_date(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    ctx.template
        .set_value(&TemplateKey::new("date"), Some(&ctx.data.date))
}

fn run_project(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    for &(name, routing) in PROJECT_FIELDS {
        let value = project_field(&ctx.data.project, name);
        write_routed(ctx.template, &TemplateKey::new(name), routing, value)?;
    }
    Ok(())
}

fn run_client(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    // No client: the client placeholders stay untouched.
    let Some(client) = &ctx.data.client else {
        return Ok(());
    };
    let template = &mut *ctx.template;
    template.set_value(&TemplateKey::new("client.name"), Some(&client.name))?;
    template.set_value(&TemplateKey::new("client.address"), client.address.as_deref())?;
    template.set_value(&TemplateKey::new("client.url"), client.url.as_deref())?;
    Ok(())
}

fn run_org(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let org = &ctx.data.org;
    let template = &mut *ctx.template;
    template.set_value(&TemplateKey::new("org.name"), Some(&org.name))?;
    template.set_value(&TemplateKey::new("org.url"), org.url.as_deref())?;
    template.set_value(&TemplateKey::new("org.email"), org.email.as_deref())?;
    Ok(())
}

fn run_project_attachments(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let attachments = &ctx.data.project.attachments;
    ctx.template
        .clone_block(&TemplateKey::new("project.attachments"), attachments.len())?;
    let image = TemplateKey::new("project.attachment.image");
    for (n, attachment) in attachments.iter().enumerate() {
        let bytes = attachment.read()?;
        ctx.template.set_image_value(&image.index(n + 1), &bytes)?;
    }
    Ok(())
}

fn run_users(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let users = &ctx.data.users;
    let name = TemplateKey::new("user.full_name");
    let bio = TemplateKey::new("user.short_bio");
    ctx.template.clone_row(&name, users.len())?;
    for (n, user) in users.iter().enumerate() {
        let i = n + 1;
        ctx.template.set_value(&name.index(i), Some(&user.full_name))?;
        ctx.template.set_value(&bio.index(i), user.short_bio.as_deref())?;
    }
    Ok(())
}

fn run_logos(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    // Logo slots are independent: one unreadable or unsupported image
    // must not block the others.
    let SectionContext { template, data } = ctx;
    for (slot, image) in &data.logos {
        let result = image
            .read()
            .map_err(rf_docx::DocxError::from)
            .and_then(|bytes| template.set_image_value(&TemplateKey::new(slot.as_str()), &bytes));
        if let Err(error) = result {
            warn!(slot = %slot, error = %error, "Logo slot skipped");
        }
    }
    Ok(())
}

fn run_vault_items(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let items = &ctx.data.vault_items;
    let name = TemplateKey::new("vaultItem.name");
    let item_type = TemplateKey::new("vaultItem.type");
    let note = TemplateKey::new("vaultItem.note");
    ctx.template.clone_row(&name, items.len())?;
    for (n, item) in items.iter().enumerate() {
        let i = n + 1;
        ctx.template.set_value(&name.index(i), Some(&item.name))?;
        ctx.template.set_value(&item_type.index(i), Some(&item.item_type))?;
        ctx.template.set_value(&note.index(i), item.note.as_deref())?;
    }
    Ok(())
}

fn run_targets(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let targets = &ctx.data.targets;
    let name = TemplateKey::new("target.name");
    let kind = TemplateKey::new("target.kind");
    ctx.template.clone_row(&name, targets.len())?;
    for (n, target) in targets.iter().enumerate() {
        let i = n + 1;
        ctx.template.set_value(&name.index(i), Some(&target.name))?;
        ctx.template.set_value(&kind.index(i), Some(&target.kind))?;
    }
    Ok(())
}

fn run_findings_overview(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let overview = findings_overview(&ctx.data.vulnerabilities);
    for finding in &overview {
        let key = TemplateKey::new(format!("findings.count.{}", finding.severity));
        ctx.template.set_value(&key, Some(&finding.count.to_string()))?;
    }
    let columns: Vec<ChartColumn> = overview.iter().map(ChartColumn::from).collect();
    if let Some(chart) = column_chart(FINDINGS_CHART_NAME, &columns) {
        ctx.template.set_chart(&TemplateKey::new("findings.chart"), &chart)?;
    }
    Ok(())
}

fn run_vulnerabilities(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let vulnerabilities = &ctx.data.vulnerabilities;
    ctx.template
        .clone_block(&TemplateKey::new("vulnerabilities"), vulnerabilities.len())?;

    let name = TemplateKey::new("vulnerability.name");
    let attachments = TemplateKey::new("vulnerability.attachments");
    let image = TemplateKey::new("vulnerability.attachment.image");
    for (n, vulnerability) in vulnerabilities.iter().enumerate() {
        let i = n + 1;
        match vulnerability.risk {
            Some(risk) => {
                let banner = severity_banner(&vulnerability.summary, risk);
                ctx.template.set_complex_fragment(&name.index(i), &banner)?;
            }
            None => {
                ctx.template
                    .set_value(&name.index(i), Some(&vulnerability.summary))?;
            }
        }
        for &(field, routing) in VULNERABILITY_FIELDS {
            let value = vulnerability_field(vulnerability, field);
            write_routed(
                ctx.template,
                &TemplateKey::new(field).index(i),
                routing,
                value.as_deref(),
            )?;
        }
        ctx.template
            .clone_block(&attachments.index(i), vulnerability.attachments.len())?;
        for (m, attachment) in vulnerability.attachments.iter().enumerate() {
            let bytes = attachment.read()?;
            ctx.template
                .set_image_value(&image.index(i).index(m + 1), &bytes)?;
        }
    }
    Ok(())
}

fn run_summary(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let vulnerabilities = &ctx.data.vulnerabilities;
    let name = TemplateKey::new("summary.name");
    let category = TemplateKey::new("summary.category_name");
    let severity = TemplateKey::new("summary.severity");
    let score = TemplateKey::new("summary.cvss_score");
    ctx.template.clone_row(&name, vulnerabilities.len())?;
    for (n, vulnerability) in vulnerabilities.iter().enumerate() {
        let i = n + 1;
        ctx.template
            .set_value(&name.index(i), Some(&vulnerability.summary))?;
        ctx.template
            .set_value(&category.index(i), vulnerability.category_name.as_deref())?;
        ctx.template.set_value(
            &severity.index(i),
            vulnerability.risk.map(|risk| risk.as_str()),
        )?;
        ctx.template.set_value(
            &score.index(i),
            vulnerability
                .cvss_score
                .map(|value| value.to_string())
                .as_deref(),
        )?;
    }
    Ok(())
}

fn run_contacts(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let contacts = &ctx.data.contacts;
    let name = TemplateKey::new("contact.name");
    let kind = TemplateKey::new("contact.kind");
    let phone = TemplateKey::new("contact.phone");
    let email = TemplateKey::new("contact.email");
    let role = TemplateKey::new("contact.role");
    ctx.template.clone_row(&name, contacts.len())?;
    for (n, contact) in contacts.iter().enumerate() {
        let i = n + 1;
        ctx.template.set_value(&name.index(i), Some(&contact.name))?;
        ctx.template.set_value(&kind.index(i), Some(&contact.kind))?;
        ctx.template.set_value(&phone.index(i), contact.phone.as_deref())?;
        ctx.template.set_value(&email.index(i), contact.email.as_deref())?;
        ctx.template.set_value(&role.index(i), contact.role.as_deref())?;
    }
    Ok(())
}

fn run_categories(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let parent_name = TemplateKey::new("parentCategory.name");
    let parent_description = TemplateKey::new("parentCategory.description");
    ctx.template
        .clone_row(&parent_name, ctx.data.parent_categories.len())?;
    for (n, category) in ctx.data.parent_categories.iter().enumerate() {
        let i = n + 1;
        ctx.template
            .set_value(&parent_name.index(i), Some(&category.name))?;
        ctx.template
            .set_value(&parent_description.index(i), category.description.as_deref())?;
    }

    let name = TemplateKey::new("category.name");
    let description = TemplateKey::new("category.description");
    ctx.template.clone_row(&name, ctx.data.categories.len())?;
    for (n, category) in ctx.data.categories.iter().enumerate() {
        let i = n + 1;
        ctx.template.set_value(&name.index(i), Some(&category.name))?;
        ctx.template
            .set_value(&description.index(i), category.description.as_deref())?;
    }
    Ok(())
}

fn run_revision_history(ctx: &mut SectionContext<'_>) -> rf_docx::Result<()> {
    let history = &ctx.data.report_history;
    let date_time = TemplateKey::new("revisionHistoryDateTime");
    let version_name = TemplateKey::new("revisionHistoryVersionName");
    let version_description = TemplateKey::new("revisionHistoryVersionDescription");
    ctx.template.clone_row(&date_time, history.len())?;
    for (n, revision) in history.iter().enumerate() {
        let i = n + 1;
        let formatted = revision.insert_ts.format(REVISION_TS_FORMAT).to_string();
        ctx.template.set_value(&date_time.index(i), Some(&formatted))?;
        ctx.template
            .set_value(&version_name.index(i), Some(&revision.version_name))?;
        ctx.template.set_value(
            &version_description.index(i),
            revision.version_description.as_deref(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_is_fixed() {
        let order: Vec<&str> = SECTIONS.iter().map(|s| s.name).collect();
        assert_eq!(
            order,
            [
                "date",
                "project",
                "client",
                "org",
                "project_attachments",
                "users",
                "logos",
                "vault_items",
                "targets",
                "findings_overview",
                "vulnerabilities",
                "summary",
                "contacts",
                "categories",
                "revision_history",
            ]
        );
    }

    #[test]
    fn test_project_routing_table() {
        let markdown: Vec<&str> = PROJECT_FIELDS
            .iter()
            .filter(|&&(_, routing)| routing == FieldRouting::Markdown)
            .map(|&(name, _)| name)
            .collect();
        assert_eq!(
            markdown,
            [
                "project.description",
                "project.management_summary",
                "project.management_conclusion",
            ]
        );
    }

    #[test]
    fn test_vulnerability_free_text_routes_through_markdown() {
        for field in [
            "vulnerability.description",
            "vulnerability.proof_of_concept",
            "vulnerability.remediation",
            "vulnerability.impact",
            "vulnerability.external_refs",
        ] {
            let routing = VULNERABILITY_FIELDS
                .iter()
                .find(|&&(name, _)| name == field)
                .map(|&(_, routing)| routing);
            assert_eq!(routing, Some(FieldRouting::Markdown), "{}", field);
        }
    }

    #[test]
    fn test_vulnerability_field_lookup() {
        let mut vulnerability = Vulnerability::new("XSS");
        vulnerability.cvss_score = Some(7.5);
        vulnerability.risk = Some(rf_model::Severity::High);
        assert_eq!(
            vulnerability_field(&vulnerability, "vulnerability.cvss_score"),
            Some("7.5".to_string())
        );
        assert_eq!(
            vulnerability_field(&vulnerability, "vulnerability.severity"),
            Some("high".to_string())
        );
        assert_eq!(vulnerability_field(&vulnerability, "vulnerability.impact"), None);
    }
}
