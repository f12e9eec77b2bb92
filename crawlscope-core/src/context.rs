use crate::audit::{
    analyze_duplicate_content, analyze_internal_links, analyze_meta_descriptions,
    analyze_not_found, analyze_thin_content,
};
use crate::config::AuditConfig;
use crate::data::CrawlExport;
use crate::error::Result;
use crate::report::{AuditReport, ExecutiveSummary, ReportMetadata};
use crawlscope_resolver::{RedirectAnalysis, Resolver};
use tracing::info;

/// Everything one audit run needs: the loaded export and its settings.
/// Built once per run and dropped with it.
pub struct AuditContext {
    export: CrawlExport,
    config: AuditConfig,
    resolver: Resolver,
}

impl AuditContext {
    pub fn new(export: CrawlExport, config: AuditConfig) -> Result<Self> {
        config.validate()?;
        let resolver = Resolver::new(config.redirects.clone())?;
        Ok(Self {
            export,
            config,
            resolver,
        })
    }

    pub fn export(&self) -> &CrawlExport {
        &self.export
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn resolve_redirects(&self) -> Result<RedirectAnalysis> {
        let records = self.export.redirect_records();
        Ok(self.resolver.resolve(&records)?)
    }

    pub fn run(&self) -> Result<AuditReport> {
        let rows = self.export.rows();
        let thresholds = &self.config.pages;

        info!("Running audit over {} rows", rows.len());

        let thin_content = analyze_thin_content(rows, thresholds);
        let duplicates = analyze_duplicate_content(rows);
        let links = analyze_internal_links(rows, thresholds);
        let redirects = self.resolve_redirects()?;
        let not_found = analyze_not_found(rows);
        let meta_descriptions = analyze_meta_descriptions(rows, thresholds);

        let kinds = self.export.kind_counts();
        let executive_summary = ExecutiveSummary {
            total_urls: kinds.total,
            total_pages: kinds.html,
            images: kinds.images,
            assets: kinds.assets,
            thin_content_pages: thin_content.len(),
            duplicate_titles: duplicates.duplicate_titles.len(),
            duplicate_metas: duplicates.duplicate_metas.len(),
            duplicate_content_groups: duplicates.duplicate_hashes.len(),
            canonical_issues: duplicates.canonical_issues.len(),
            link_issues: links.link_issues.len(),
            orphaned_pages: links.orphaned_pages.len(),
            total_redirects: redirects.total_redirects,
            redirect_chains: redirects.long_chains.len(),
            redirect_loops: redirects.loops.len(),
            temp_redirects: redirects.temporary.len(),
            slow_redirects: redirects.slow.len(),
            not_found: not_found.len(),
            missing_meta: meta_descriptions.missing.len(),
            short_meta: meta_descriptions.short.len(),
            long_meta: meta_descriptions.long.len(),
        };

        info!(
            "Audit complete: {} thin pages, {} link issues, {} redirect chains, {} loops",
            executive_summary.thin_content_pages,
            executive_summary.link_issues,
            executive_summary.redirect_chains,
            executive_summary.redirect_loops
        );

        Ok(AuditReport {
            metadata: ReportMetadata::new(self.export.source()),
            config: self.config.clone(),
            executive_summary,
            thin_content,
            duplicates,
            links,
            redirects,
            not_found,
            meta_descriptions,
        })
    }
}
