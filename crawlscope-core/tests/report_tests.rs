// Tests for the audit context and report rendering

use crawlscope_core::report::{
    extract_url_path, format_chain, generate_json_report, generate_redirect_section,
    generate_text_report, save_report,
};
use crawlscope_core::{AuditConfig, AuditContext, AuditError, CrawlExport, ReportFormat};
use crawlscope_resolver::{DuplicatePolicy, ResolverConfig, ResolverError};
use std::fs;
use tempfile::TempDir;

const SITE: &str = "\
Address,Content Type,Status Code,Status,Redirect URL,Response Time,Word Count,Text Ratio,Title 1,Title 1 Length,Meta Description 1,Meta Description 1 Length,H1-1,H2-1,Inlinks,Outlinks,Crawl Depth
https://dirt.test/,text/html,200,OK,,0.10,900,20.0,Dirtworks Landscaping and Garden Design,39,Landscaping services for gardens patios and lawns in the valley with free quotes and fast scheduling all year round,130,Dirtworks,Services,25,30,0
https://dirt.test/thin,text/html,200,OK,,0.10,80,2.0,Thin,4,,0,,,0,2,4
https://dirt.test/a,text/html,301,Moved Permanently,https://dirt.test/b,0.30,,,,,,,,,,,
https://dirt.test/b,text/html,301,Moved Permanently,https://dirt.test/c,0.30,,,,,,,,,,,
https://dirt.test/c,text/html,301,Moved Permanently,https://dirt.test/d,0.30,,,,,,,,,,,
https://dirt.test/d,text/html,302,Found,https://dirt.test/e,2.50,,,,,,,,,,,
https://dirt.test/x,text/html,301,Moved Permanently,https://dirt.test/y,0.20,,,,,,,,,,,
https://dirt.test/y,text/html,301,Moved Permanently,https://dirt.test/x,0.20,,,,,,,,,,,
https://dirt.test/gone,text/html,404,Not Found,,0.05,,,,,,,,,,,
https://dirt.test/logo.png,image/png,200,OK,,0.05,,,,,,,,,,,
";

fn site_export() -> CrawlExport {
    CrawlExport::from_reader(SITE.as_bytes()).unwrap()
}

// ============================================================================
// Audit Context Tests
// ============================================================================

#[test]
fn test_run_builds_summary() {
    let context = AuditContext::new(site_export(), AuditConfig::default()).unwrap();
    let report = context.run().unwrap();
    let summary = &report.executive_summary;

    assert_eq!(summary.total_urls, 10);
    assert_eq!(summary.images, 1);
    assert_eq!(summary.total_redirects, 6);
    assert_eq!(summary.redirect_chains, 1);
    assert_eq!(summary.redirect_loops, 2);
    assert_eq!(summary.temp_redirects, 1);
    assert_eq!(summary.slow_redirects, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.orphaned_pages, 8);

    let long_chain = &report.redirects.long_chains[0];
    assert_eq!(long_chain.source_url, "https://dirt.test/a");
    assert_eq!(long_chain.hop_count, 4);
    assert_eq!(long_chain.path.last().map(String::as_str), Some("https://dirt.test/e"));
}

#[test]
fn test_run_is_repeatable() {
    let context = AuditContext::new(site_export(), AuditConfig::default()).unwrap();
    let first = context.run().unwrap();
    let second = context.run().unwrap();

    assert_eq!(first.executive_summary, second.executive_summary);
    assert_eq!(first.redirects, second.redirects);
    assert_ne!(first.metadata.run_id, second.metadata.run_id);
}

#[test]
fn test_context_rejects_invalid_config() {
    let mut config = AuditConfig::default();
    config.redirects.max_hops = 0;

    let result = AuditContext::new(site_export(), config);
    assert!(matches!(result, Err(AuditError::ResolverError(ResolverError::InvalidConfig(_)))));
}

#[test]
fn test_context_rejects_inverted_title_bounds() {
    let mut config = AuditConfig::default();
    config.pages.min_title_length = 70;

    let result = AuditContext::new(site_export(), config);
    assert!(matches!(result, Err(AuditError::InvalidConfig(_))));
}

#[test]
fn test_reject_duplicates_surfaces_resolver_error() {
    let csv = "Address,Status Code,Redirect URL\n\
               https://dirt.test/a,301,https://dirt.test/b\n\
               https://dirt.test/a,301,https://dirt.test/c\n";
    let export = CrawlExport::from_reader(csv.as_bytes()).unwrap();
    let config = AuditConfig {
        redirects: ResolverConfig::default().with_duplicate_policy(DuplicatePolicy::Reject),
        ..Default::default()
    };

    let context = AuditContext::new(export, config).unwrap();
    let result = context.resolve_redirects();

    assert!(matches!(
        result,
        Err(AuditError::ResolverError(ResolverError::DuplicateSource(ref url)))
            if url == "https://dirt.test/a"
    ));
}

#[test]
fn test_config_from_json_partial() {
    let config = AuditConfig::from_json_str(
        r#"{"pages": {"min_word_count": 500}, "redirects": {"slow_response_threshold_seconds": 0.5}}"#,
    )
    .unwrap();

    assert_eq!(config.pages.min_word_count, 500);
    assert_eq!(config.pages.max_title_length, 60);
    assert_eq!(config.redirects.slow_response_threshold_seconds, 0.5);
    assert_eq!(config.redirects.max_hops, 10);
}

#[test]
fn test_config_from_json_invalid() {
    let result = AuditConfig::from_json_str(r#"{"redirects": {"slow_response_threshold_seconds": -1}}"#);
    assert!(matches!(result, Err(AuditError::ResolverError(_))));

    let result = AuditConfig::from_json_str("not json");
    assert!(matches!(result, Err(AuditError::JsonError(_))));
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_sections() {
    let context = AuditContext::new(site_export(), AuditConfig::default()).unwrap();
    let text = generate_text_report(&context.run().unwrap());

    assert!(text.contains("CRAWLSCOPE SEO AUDIT REPORT"));
    for section in [
        "EXECUTIVE SUMMARY",
        "THIN CONTENT",
        "DUPLICATE CONTENT",
        "INTERNAL LINK STRUCTURE",
        "REDIRECTS",
        "404 ERRORS",
        "META DESCRIPTIONS",
        "PRIORITY MATRIX",
    ] {
        assert!(text.contains(section), "missing section {}", section);
    }
    assert!(text.contains("https://dirt.test/gone (Not Found)"));
    assert!(text.contains("[HIGH]"));
    assert!(text.contains("End of Report"));
}

#[test]
fn test_redirect_section_lines() {
    let context = AuditContext::new(site_export(), AuditConfig::default()).unwrap();
    let analysis = context.resolve_redirects().unwrap();
    let section = generate_redirect_section(&analysis, &ResolverConfig::default());

    assert!(section.contains("Total redirects: 6"));
    assert!(section.contains("Redirect chains (>3 hops): 1"));
    assert!(section.contains("https://dirt.test/a → /b → /c → /d → /e"));
    assert!(section.contains("Redirect loops: 2"));
    assert!(section.contains("Temporary redirects (302, should be 301): 1"));
    assert!(section.contains("Slow redirects (>1s): 1"));
    assert!(section.contains("https://dirt.test/d → https://dirt.test/e (2.500s)"));
}

#[test]
fn test_empty_export_report() {
    let context = AuditContext::new(CrawlExport::default(), AuditConfig::default()).unwrap();
    let text = generate_text_report(&context.run().unwrap());

    assert!(text.contains("Total redirects: 0"));
    assert!(text.contains("Nothing to fix."));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_shape() {
    let context = AuditContext::new(site_export(), AuditConfig::default()).unwrap();
    let json = generate_json_report(&context.run().unwrap()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let report = &value["report"];

    assert_eq!(report["metadata"]["generator"], "crawlscope");
    assert_eq!(report["metadata"]["format"], "json");
    assert_eq!(report["executive_summary"]["redirect_loops"], 2);
    assert_eq!(report["redirects"]["loops"].as_array().unwrap().len(), 2);
    assert_eq!(report["404s"][0]["url"], "https://dirt.test/gone");
    assert_eq!(report["configuration"]["redirects"]["duplicate_policy"], "last_write_wins");
}

// ============================================================================
// Formatting Helper Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("html"), None);
    assert_eq!(ReportFormat::Json.extension(), "json");
}

#[test]
fn test_extract_url_path() {
    assert_eq!(extract_url_path("https://dirt.test/services/lawns"), "/services/lawns");
    assert_eq!(extract_url_path("https://dirt.test/"), "/");
    assert_eq!(extract_url_path("https://dirt.test"), "/");
    assert_eq!(extract_url_path("not a url"), "not a url");
}

#[test]
fn test_format_chain() {
    let path = vec![
        "https://dirt.test/a".to_string(),
        "https://dirt.test/b?page=2".to_string(),
        "https://other.test/c".to_string(),
        String::new(),
    ];
    assert_eq!(
        format_chain(&path),
        "https://dirt.test/a → /b?page=2 → https://other.test/c → (empty)"
    );
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("audit.txt");

    save_report("report body", &path)?;

    assert_eq!(fs::read_to_string(&path)?, "report body");
    Ok(())
}
