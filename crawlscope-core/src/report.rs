// Report assembly and rendering

use crate::audit::{
    ContentIssue, DuplicateReport, LinkReport, MetaReport, NotFoundPage, truncate_chars,
};
use crate::config::AuditConfig;
use crawlscope_resolver::{RedirectAnalysis, RedirectRecord, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

const HEAVY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

/// Longest listing printed per bucket in the text report. JSON keeps everything.
pub const TEXT_LIST_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub run_id: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ReportMetadata {
    pub fn new(source: Option<&Path>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: source.map(|p| p.display().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub total_urls: usize,
    pub total_pages: usize,
    pub images: usize,
    pub assets: usize,
    pub thin_content_pages: usize,
    pub duplicate_titles: usize,
    pub duplicate_metas: usize,
    pub duplicate_content_groups: usize,
    pub canonical_issues: usize,
    pub link_issues: usize,
    pub orphaned_pages: usize,
    pub total_redirects: usize,
    pub redirect_chains: usize,
    pub redirect_loops: usize,
    pub temp_redirects: usize,
    pub slow_redirects: usize,
    pub not_found: usize,
    pub missing_meta: usize,
    pub short_meta: usize,
    pub long_meta: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub metadata: ReportMetadata,
    pub config: AuditConfig,
    pub executive_summary: ExecutiveSummary,
    pub thin_content: Vec<ContentIssue>,
    pub duplicates: DuplicateReport,
    pub links: LinkReport,
    pub redirects: RedirectAnalysis,
    pub not_found: Vec<NotFoundPage>,
    pub meta_descriptions: MetaReport,
}

fn push_section(report: &mut String, title: &str) {
    report.push_str(HEAVY_RULE);
    report.push_str(title);
    report.push('\n');
    report.push_str(HEAVY_RULE);
    report.push('\n');
}

fn push_overflow(report: &mut String, total: usize) {
    if total > TEXT_LIST_LIMIT {
        report.push_str(&format!("  ... and {} more\n", total - TEXT_LIST_LIMIT));
    }
}

pub fn generate_text_report(data: &AuditReport) -> String {
    let summary = &data.executive_summary;
    let pages = &data.config.pages;
    let mut report = String::new();

    // Header
    report.push_str(HEAVY_RULE);
    report.push_str("                         CRAWLSCOPE SEO AUDIT REPORT\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');

    if let Some(ref source) = data.metadata.source {
        report.push_str(&format!("Source:       {}\n", source));
    }
    report.push_str(&format!("Run ID:       {}\n", data.metadata.run_id));
    report.push_str(&format!("Generated:    {}\n", format_timestamp(&data.metadata.generated_at)));
    report.push_str(&format!("Total URLs:   {}\n", summary.total_urls));
    report.push_str(&format!("HTML Pages:   {}\n", summary.total_pages));
    report.push_str(&format!("Redirects:    {}\n", summary.total_redirects));
    report.push_str(&format!("Images:       {}\n", summary.images));
    report.push_str(&format!("CSS/JS:       {}\n", summary.assets));
    report.push('\n');

    // Executive Summary
    push_section(&mut report, "EXECUTIVE SUMMARY");
    let rows: Vec<(String, usize)> = vec![
        ("Thin Content Pages".to_string(), summary.thin_content_pages),
        ("Duplicate Titles".to_string(), summary.duplicate_titles),
        ("Duplicate Meta Descriptions".to_string(), summary.duplicate_metas),
        ("Identical Content Groups".to_string(), summary.duplicate_content_groups),
        ("Canonical Mismatches".to_string(), summary.canonical_issues),
        ("Link Structure Issues".to_string(), summary.link_issues),
        ("Orphaned Pages".to_string(), summary.orphaned_pages),
        (
            format!(
                "Redirect Chains (>{} hops)",
                data.config.redirects.long_chain_hop_threshold
            ),
            summary.redirect_chains,
        ),
        ("Redirect Loops".to_string(), summary.redirect_loops),
        ("Temporary Redirects (302)".to_string(), summary.temp_redirects),
        (
            format!(
                "Slow Redirects (>{}s)",
                data.config.redirects.slow_response_threshold_seconds
            ),
            summary.slow_redirects,
        ),
        ("404 Errors".to_string(), summary.not_found),
        ("Missing Meta Descriptions".to_string(), summary.missing_meta),
        (
            format!("Short Meta Descriptions (<{})", pages.min_meta_description_length),
            summary.short_meta,
        ),
        (
            format!("Long Meta Descriptions (>{})", pages.max_meta_description_length),
            summary.long_meta,
        ),
    ];
    for (label, count) in rows {
        report.push_str(&format!("  {:<40} {}\n", label, count));
    }
    report.push('\n');

    // Thin content
    push_section(&mut report, "THIN CONTENT");
    if data.thin_content.is_empty() {
        report.push_str("  No thin content pages found.\n");
    }
    for page in data.thin_content.iter().take(TEXT_LIST_LIMIT) {
        report.push_str(&format!("  • {}\n", page.url));
        report.push_str(&format!(
            "    Words: {}, Text ratio: {:.2}%, H2s: {}\n",
            page.word_count, page.text_ratio, page.h2_count
        ));
        for issue in &page.issues {
            report.push_str(&format!("    - {}\n", issue));
        }
    }
    push_overflow(&mut report, data.thin_content.len());
    report.push('\n');

    // Duplicates
    push_section(&mut report, "DUPLICATE CONTENT");
    push_groups(&mut report, "Duplicate titles", &data.duplicates.duplicate_titles);
    push_groups(&mut report, "Duplicate meta descriptions", &data.duplicates.duplicate_metas);
    push_groups(&mut report, "Identical content (hash)", &data.duplicates.duplicate_hashes);
    report.push_str(&format!(
        "Canonical mismatches: {}\n",
        data.duplicates.canonical_issues.len()
    ));
    for issue in data.duplicates.canonical_issues.iter().take(TEXT_LIST_LIMIT) {
        report.push_str(&format!("  • {} → {}\n", issue.url, issue.canonical));
    }
    push_overflow(&mut report, data.duplicates.canonical_issues.len());
    report.push('\n');

    // Links
    push_section(&mut report, "INTERNAL LINK STRUCTURE");
    report.push_str(&format!("Orphaned pages: {}\n", data.links.orphaned_pages.len()));
    for url in data.links.orphaned_pages.iter().take(TEXT_LIST_LIMIT) {
        report.push_str(&format!("  • {}\n", url));
    }
    push_overflow(&mut report, data.links.orphaned_pages.len());
    report.push_str(&format!("\nPages with link issues: {}\n", data.links.link_issues.len()));
    for issue in data.links.link_issues.iter().take(TEXT_LIST_LIMIT) {
        let problems: Vec<String> = issue.issues.iter().map(|i| i.to_string()).collect();
        report.push_str(&format!("  • {}\n    {}\n", issue.url, problems.join("; ")));
    }
    push_overflow(&mut report, data.links.link_issues.len());
    report.push('\n');

    // Redirects
    push_section(&mut report, "REDIRECTS");
    report.push_str(&generate_redirect_section(&data.redirects, &data.config.redirects));
    report.push('\n');

    // 404s
    push_section(&mut report, "404 ERRORS");
    if data.not_found.is_empty() {
        report.push_str("  No 404 responses found.\n");
    }
    for page in data.not_found.iter().take(TEXT_LIST_LIMIT) {
        if page.status.is_empty() {
            report.push_str(&format!("  • {}\n", page.url));
        } else {
            report.push_str(&format!("  • {} ({})\n", page.url, page.status));
        }
    }
    push_overflow(&mut report, data.not_found.len());
    report.push('\n');

    // Meta descriptions
    push_section(&mut report, "META DESCRIPTIONS");
    report.push_str(&format!("Missing: {}\n", data.meta_descriptions.missing.len()));
    for url in data.meta_descriptions.missing.iter().take(TEXT_LIST_LIMIT) {
        report.push_str(&format!("  • {}\n", url));
    }
    push_overflow(&mut report, data.meta_descriptions.missing.len());
    for (label, snippets) in [
        ("Short", &data.meta_descriptions.short),
        ("Long", &data.meta_descriptions.long),
    ] {
        report.push_str(&format!("\n{}: {}\n", label, snippets.len()));
        for snippet in snippets.iter().take(TEXT_LIST_LIMIT) {
            report.push_str(&format!("  • {} ({} chars)\n", snippet.url, snippet.length));
            report.push_str(&format!("    {}\n", snippet.meta));
        }
        push_overflow(&mut report, snippets.len());
    }
    report.push('\n');

    // Priority matrix
    push_section(&mut report, "PRIORITY MATRIX");
    report.push_str(&generate_priority_matrix(data));
    report.push('\n');

    // Footer
    report.push_str(HEAVY_RULE);
    report.push_str("                                End of Report\n");
    report.push_str(HEAVY_RULE);
    report.push_str("\nGenerated by crawlscope\n\n");

    report
}

fn push_groups(report: &mut String, label: &str, groups: &BTreeMap<String, Vec<String>>) {
    report.push_str(&format!("{}: {}\n", label, groups.len()));
    for (value, urls) in groups.iter().take(TEXT_LIST_LIMIT) {
        report.push_str(&format!(
            "  • '{}' appears {} times\n",
            truncate_chars(value, 70),
            urls.len()
        ));
        for url in urls.iter().take(3) {
            report.push_str(&format!("    - {}\n", url));
        }
    }
    push_overflow(report, groups.len());
    report.push('\n');
}

/// Flattened listing of one resolver pass.
pub fn generate_redirect_section(analysis: &RedirectAnalysis, config: &ResolverConfig) -> String {
    let mut section = String::new();

    section.push_str(&format!("Total redirects: {}\n\n", analysis.total_redirects));

    section.push_str(&format!(
        "Redirect chains (>{} hops): {}\n",
        config.long_chain_hop_threshold,
        analysis.long_chains.len()
    ));
    for chain in analysis.long_chains.iter().take(TEXT_LIST_LIMIT) {
        section.push_str(&format!(
            "  • {} ({} hops, {})\n",
            chain.source_url,
            chain.hop_count,
            chain.terminal.as_str()
        ));
        section.push_str(&format!("    {}\n", format_chain(&chain.path)));
    }
    push_overflow(&mut section, analysis.long_chains.len());

    section.push_str(&format!("\nRedirect loops: {}\n", analysis.loops.len()));
    for redirect_loop in analysis.loops.iter().take(TEXT_LIST_LIMIT) {
        section.push_str(&format!("  • {}\n", redirect_loop.source_url));
        section.push_str(&format!("    {}\n", format_chain(&redirect_loop.path)));
    }
    push_overflow(&mut section, analysis.loops.len());

    section.push_str(&format!(
        "\nTemporary redirects (302, should be 301): {}\n",
        analysis.temporary.len()
    ));
    push_records(&mut section, &analysis.temporary, false);

    section.push_str(&format!(
        "\nSlow redirects (>{}s): {}\n",
        config.slow_response_threshold_seconds,
        analysis.slow.len()
    ));
    let mut slowest: Vec<&RedirectRecord> = analysis.slow.iter().collect();
    slowest.sort_by(|a, b| b.response_time_seconds.total_cmp(&a.response_time_seconds));
    push_records(&mut section, slowest.into_iter(), true);

    section
}

fn push_records<'a, I>(section: &mut String, records: I, with_time: bool)
where
    I: IntoIterator<Item = &'a RedirectRecord>,
{
    let mut total = 0;
    for record in records {
        total += 1;
        if total > TEXT_LIST_LIMIT {
            continue;
        }
        let target = if record.target_url.is_empty() {
            "N/A"
        } else {
            record.target_url.as_str()
        };
        if with_time {
            section.push_str(&format!(
                "  • {} → {} ({:.3}s)\n",
                record.source_url, target, record.response_time_seconds
            ));
        } else {
            section.push_str(&format!("  • {} → {}\n", record.source_url, target));
        }
    }
    push_overflow(section, total);
}

fn generate_priority_matrix(data: &AuditReport) -> String {
    let summary = &data.executive_summary;
    let mut high = Vec::new();
    let mut medium = Vec::new();
    let mut low = Vec::new();

    if summary.missing_meta > 0 {
        high.push("Missing Meta Descriptions - Add unique meta descriptions to all pages");
    }
    if summary.short_meta > 0 {
        high.push("Short Meta Descriptions - Expand to the recommended length");
    }
    if summary.duplicate_titles > 0 {
        high.push("Duplicate Titles - Create unique, descriptive titles for each page");
    }
    if summary.temp_redirects > 0 {
        high.push("Temporary Redirects (302) - Convert to permanent 301 redirects");
    }
    if summary.redirect_loops > 0 {
        high.push("Redirect Loops - Point each looping URL at a final destination");
    }
    if summary.not_found > 0 {
        high.push("404 Errors - Restore or redirect missing pages");
    }

    if summary.thin_content_pages > 0 {
        medium.push("Thin Content Pages - Expand content and page structure");
    }
    if summary.orphaned_pages > 0 {
        medium.push("Orphaned Pages - Add internal links to these pages");
    }
    if summary.duplicate_metas > 0 {
        medium.push("Duplicate Meta Descriptions - Create unique descriptions");
    }
    if summary.redirect_chains > 0 {
        medium.push("Redirect Chains - Link straight to the final URL");
    }
    if summary.slow_redirects > 0 {
        medium.push("Slow Redirects - Check server-side redirect handling");
    }

    if summary.link_issues > 0 {
        low.push("Link Structure - Flatten deep pages and review excessive outlinks");
    }
    if summary.long_meta > 0 {
        low.push("Long Meta Descriptions - Trim to the recommended length");
    }
    if summary.canonical_issues > 0 {
        low.push("Canonical Mismatches - Confirm each canonical target is intended");
    }

    let mut matrix = String::new();
    for (label, items) in [("[HIGH]", high), ("[MEDIUM]", medium), ("[LOW]", low)] {
        if items.is_empty() {
            continue;
        }
        matrix.push_str(&format!("{}\n", label));
        for (idx, item) in items.iter().enumerate() {
            matrix.push_str(&format!("  {}. {}\n", idx + 1, item));
        }
        matrix.push('\n');
    }
    if matrix.is_empty() {
        matrix.push_str("  Nothing to fix.\n");
    }
    matrix.push_str(LIGHT_RULE);
    matrix
}

pub fn generate_json_report(data: &AuditReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "crawlscope",
                "version": env!("CARGO_PKG_VERSION"),
                "run_id": data.metadata.run_id,
                "generated_at": data.metadata.generated_at,
                "source": data.metadata.source,
                "format": "json"
            },
            "configuration": data.config,
            "executive_summary": data.executive_summary,
            "thin_content": data.thin_content,
            "duplicates": data.duplicates,
            "links": data.links,
            "redirects": data.redirects,
            "404s": data.not_found,
            "meta_descriptions": data.meta_descriptions
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// JSON document holding only the redirect section.
pub fn generate_redirect_json(
    analysis: &RedirectAnalysis,
    config: &ResolverConfig,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "configuration": config,
        "redirects": analysis
    }))
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Path of a URL, `/` for the root, or the input unchanged when it does not parse
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Render a redirect path, shortening each hop to its path when it stays on
/// the previous hop's host.
pub fn format_chain(path: &[String]) -> String {
    let mut parts = Vec::with_capacity(path.len());
    let mut previous_host: Option<String> = None;

    for url in path {
        let parsed = Url::parse(url).ok();
        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(str::to_string);

        let rendered = match (&previous_host, &host, &parsed) {
            (Some(prev), Some(cur), Some(parsed)) if prev == cur => {
                let mut shown = extract_url_path(url);
                if let Some(query) = parsed.query() {
                    shown.push('?');
                    shown.push_str(query);
                }
                shown
            }
            _ if url.is_empty() => "(empty)".to_string(),
            _ => url.clone(),
        };

        parts.push(rendered);
        previous_host = host;
    }

    parts.join(" → ")
}

fn format_timestamp(rfc3339: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}
