use crawlscope::handlers::*;
use crawlscope_core::{AuditConfig, AuditContext, ReportFormat};
use crawlscope_resolver::{DuplicatePolicy, ResolverConfig};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const EXPORT: &str = "\
Address,Content Type,Status Code,Status,Redirect URL,Response Time,Inlinks
https://example.com/,text/html,200,OK,,0.10,5
https://example.com/old,text/html,302,Found,https://example.com/,1.80,0
";

fn write_export() -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", EXPORT).unwrap();
    temp_file
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(
        expand_path("/tmp/crawl.csv"),
        std::path::PathBuf::from("/tmp/crawl.csv")
    );
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/crawl.csv");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("crawl.csv"));
}

#[test]
fn test_overrides_apply_only_what_is_set() {
    let overrides = ConfigOverrides {
        max_hops: Some(4),
        reject_duplicates: true,
        ..Default::default()
    };

    let config = overrides.apply(ResolverConfig::default());

    assert_eq!(config.max_hops, 4);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    assert_eq!(config.long_chain_hop_threshold, 3);
    assert_eq!(config.slow_response_threshold_seconds, 1.0);
}

#[test]
fn test_build_config_defaults() {
    let config = build_config(None, &ConfigOverrides::default()).unwrap();
    assert_eq!(config, AuditConfig::default());
}

#[test]
fn test_build_config_flags_override_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut config_file = NamedTempFile::new()?;
    write!(
        config_file,
        r#"{{"redirects": {{"slow_response_threshold_seconds": 3.0, "max_hops": 20}}}}"#
    )?;

    let overrides = ConfigOverrides {
        slow_threshold: Some(0.5),
        ..Default::default()
    };
    let config = build_config(Some(config_file.path()), &overrides)?;

    assert_eq!(config.redirects.slow_response_threshold_seconds, 0.5);
    assert_eq!(config.redirects.max_hops, 20);
    Ok(())
}

#[test]
fn test_build_config_rejects_invalid_override() {
    let overrides = ConfigOverrides {
        max_hops: Some(0),
        ..Default::default()
    };
    assert!(build_config(None, &overrides).is_err());
}

#[test]
fn test_build_config_missing_file() {
    let result = build_config(
        Some(std::path::Path::new("/nonexistent/crawlscope.json")),
        &ConfigOverrides::default(),
    );
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to load config file"));
}

#[test]
fn test_load_export() {
    let temp_file = write_export();
    let export = load_export(temp_file.path(), true).unwrap();
    assert_eq!(export.len(), 2);
}

#[test]
fn test_load_export_missing_file() {
    let result = load_export(std::path::Path::new("/nonexistent/crawl.csv"), true);
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to load crawl export"));
}

#[test]
fn test_render_and_write_audit() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = write_export();
    let export = load_export(temp_file.path(), true)?;
    let context = AuditContext::new(export, AuditConfig::default())?;
    let report = context.run()?;

    let json = render_audit(&report, ReportFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["report"]["executive_summary"]["temp_redirects"], 1);

    let dir = TempDir::new()?;
    let output = dir.path().join("audit.txt");
    let text = render_audit(&report, ReportFormat::Text)?;
    write_output(&text, Some(&output))?;

    let saved = fs::read_to_string(&output)?;
    assert!(saved.contains("CRAWLSCOPE SEO AUDIT REPORT"));
    Ok(())
}

#[test]
fn test_render_redirects() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = write_export();
    let export = load_export(temp_file.path(), true)?;
    let context = AuditContext::new(export, AuditConfig::default())?;
    let analysis = context.resolve_redirects()?;

    let text = render_redirects(&analysis, &context.config().redirects, ReportFormat::Text)?;
    assert!(text.contains("Temporary redirects (302, should be 301): 1"));
    assert!(text.contains("Slow redirects (>1s): 1"));

    let json = render_redirects(&analysis, &context.config().redirects, ReportFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["redirects"]["total_redirects"], 1);
    Ok(())
}

#[test]
fn test_format_chain_reexport() {
    let path = vec![
        "https://example.com/old".to_string(),
        "https://example.com/".to_string(),
    ];
    assert_eq!(crawlscope::format_chain(&path), "https://example.com/old → /");
}

#[test]
fn test_resolve_output_path_into_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    let in_dir = resolve_output_path(dir.path(), ReportFormat::Json, "redirects");
    assert_eq!(in_dir, dir.path().join("crawlscope-redirects.json"));

    let file = dir.path().join("custom.txt");
    assert_eq!(resolve_output_path(&file, ReportFormat::Json, "audit"), file);
    Ok(())
}

fn run_binary(args: &[&str]) -> std::process::Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_crawlscope"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_json_stdout_is_parseable_with_banner() {
    let temp_file = write_export();
    let path = temp_file.path().to_str().unwrap();

    for command in ["redirects", "audit"] {
        let output = run_binary(&[command, path, "-f", "json"]);
        assert!(output.status.success(), "{} exited with {:?}", command, output.status);

        let stdout = String::from_utf8(output.stdout).unwrap();
        let value: Result<serde_json::Value, _> = serde_json::from_str(&stdout);
        assert!(value.is_ok(), "{} stdout is not JSON:\n{}", command, stdout);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("crawlscope v"));
    }
}

#[test]
fn test_missing_export_exits_with_error() {
    let output = run_binary(&["-q", "audit", "/nonexistent/crawl.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
