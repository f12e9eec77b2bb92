use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use crawlscope_core::report::{
    ExecutiveSummary, generate_json_report, generate_redirect_json, generate_redirect_section,
    generate_text_report, save_report,
};
use crawlscope_core::{AuditConfig, AuditContext, AuditReport, CrawlExport, ReportFormat};
use crawlscope_resolver::{DuplicatePolicy, RedirectAnalysis, ResolverConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, debug, info, warn};

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Redirect settings given on the command line. Anything set here wins over
/// the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub slow_threshold: Option<f64>,
    pub long_chain_threshold: Option<usize>,
    pub max_hops: Option<usize>,
    pub reject_duplicates: bool,
}

impl ConfigOverrides {
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self {
            slow_threshold: args.get_one::<f64>("slow-threshold").copied(),
            long_chain_threshold: args.get_one::<usize>("long-chain-threshold").copied(),
            max_hops: args.get_one::<usize>("max-hops").copied(),
            reject_duplicates: args.get_flag("reject-duplicates"),
        }
    }

    pub fn apply(&self, mut redirects: ResolverConfig) -> ResolverConfig {
        if let Some(seconds) = self.slow_threshold {
            redirects = redirects.with_slow_response_threshold(seconds);
        }
        if let Some(hops) = self.long_chain_threshold {
            redirects = redirects.with_long_chain_hop_threshold(hops);
        }
        if let Some(max_hops) = self.max_hops {
            redirects = redirects.with_max_hops(max_hops);
        }
        if self.reject_duplicates {
            redirects = redirects.with_duplicate_policy(DuplicatePolicy::Reject);
        }
        redirects
    }
}

/// Defaults, then the JSON config file if one was given, then flag overrides.
pub fn build_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AuditConfig> {
    let mut config = match config_path {
        Some(path) => AuditConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => AuditConfig::default(),
    };

    config.redirects = overrides.apply(config.redirects);
    config.validate().context("Invalid audit configuration")?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

pub fn load_export(path: &Path, quiet: bool) -> Result<CrawlExport> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading crawl export {}", path.display()));

    let export = CrawlExport::load(path);
    spinner.finish_and_clear();

    let export =
        export.with_context(|| format!("Failed to load crawl export {}", path.display()))?;
    if export.skipped_rows() > 0 {
        warn!("Skipped {} rows without an Address", export.skipped_rows());
    }
    if export.degraded_rows() > 0 {
        warn!(
            "{} rows contained invalid UTF-8 and were decoded lossily",
            export.degraded_rows()
        );
    }
    Ok(export)
}

pub fn render_audit(report: &AuditReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report).context("Failed to serialize report"),
    }
}

pub fn render_redirects(
    analysis: &RedirectAnalysis,
    config: &ResolverConfig,
    format: ReportFormat,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_redirect_section(analysis, config)),
        ReportFormat::Json => {
            generate_redirect_json(analysis, config).context("Failed to serialize redirects")
        }
    }
}

/// An output naming an existing directory gets a default file name inside it,
/// with the extension of the chosen format.
pub fn resolve_output_path(output: &Path, format: ReportFormat, stem: &str) -> PathBuf {
    if output.is_dir() {
        output.join(format!("crawlscope-{}.{}", stem, format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// Write to `output` when given, otherwise print to stdout
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            save_report(content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
            println!(
                "{} Report saved to: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn parse_format(args: &ArgMatches) -> Result<ReportFormat> {
    let raw = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    ReportFormat::from_str(raw).ok_or_else(|| anyhow!("Unsupported report format '{}'", raw))
}

struct CommonArgs {
    csv: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
    config: AuditConfig,
}

fn parse_common(args: &ArgMatches) -> Result<CommonArgs> {
    let csv = args
        .get_one::<String>("CSV")
        .map(|raw| expand_path(raw))
        .context("A crawl export CSV path is required")?;
    let output = args.get_one::<String>("output").map(|raw| expand_path(raw));
    let config_path = args.get_one::<String>("config").map(|raw| expand_path(raw));

    let overrides = ConfigOverrides::from_matches(args);
    let config = build_config(config_path.as_deref(), &overrides)?;

    Ok(CommonArgs {
        csv,
        output,
        format: parse_format(args)?,
        config,
    })
}

fn print_count(label: &str, count: usize) {
    let shown = if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().yellow().bold()
    };
    println!("  {:<32} {}", label, shown);
}

pub fn print_summary(summary: &ExecutiveSummary) {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!("{}", "  AUDIT SUMMARY".bright_white().bold());
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "  {} URLs, {} HTML pages",
        summary.total_urls.to_string().bright_white(),
        summary.total_pages.to_string().bright_white()
    );
    print_count("Thin content pages", summary.thin_content_pages);
    print_count("Duplicate titles", summary.duplicate_titles);
    print_count("Orphaned pages", summary.orphaned_pages);
    print_count("Redirect chains", summary.redirect_chains);
    print_count("Redirect loops", summary.redirect_loops);
    print_count("Temporary redirects", summary.temp_redirects);
    print_count("Slow redirects", summary.slow_redirects);
    print_count("404 errors", summary.not_found);
    print_count("Missing meta descriptions", summary.missing_meta);
    println!();
}

pub fn handle_audit(args: &ArgMatches, quiet: bool) -> Result<()> {
    let common = parse_common(args)?;
    let export = load_export(&common.csv, quiet)?;

    let context = AuditContext::new(export, common.config).context("Failed to set up audit")?;
    let report = context.run().context("Audit failed")?;
    let content = render_audit(&report, common.format)?;
    let output = common
        .output
        .as_deref()
        .map(|path| resolve_output_path(path, common.format, "audit"));

    if output.is_some() && !quiet {
        print_summary(&report.executive_summary);
    }
    write_output(&content, output.as_deref())
}

pub fn handle_redirects(args: &ArgMatches, quiet: bool) -> Result<()> {
    let common = parse_common(args)?;
    let export = load_export(&common.csv, quiet)?;

    let context = AuditContext::new(export, common.config).context("Failed to set up audit")?;
    let analysis = context
        .resolve_redirects()
        .context("Redirect analysis failed")?;
    let content = render_redirects(&analysis, &context.config().redirects, common.format)?;
    let output = common
        .output
        .as_deref()
        .map(|path| resolve_output_path(path, common.format, "redirects"));

    if output.is_some() && !quiet {
        println!(
            "{} {} redirects, {} long chains, {} loops",
            "✓".green().bold(),
            analysis.total_redirects,
            analysis.long_chains.len(),
            analysis.loops.len()
        );
    }
    write_output(&content, output.as_deref())
}
