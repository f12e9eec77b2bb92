pub mod audit;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod report;

pub use config::{AuditConfig, PageThresholds};
pub use context::AuditContext;
pub use data::{CrawlExport, CrawlRow, ResourceKind};
pub use error::{AuditError, Result};
pub use report::{AuditReport, ReportFormat};

const BANNER: &str = r#"
  ┌──────────────────────────────────────────┐
  │   c  r  a  w  l  s  c  o  p  e           │
  │   crawl export auditor                   │
  └──────────────────────────────────────────┘"#;

/// Writes to stderr. Stdout carries only reports.
pub fn print_banner() {
    eprintln!("{}", BANNER);
    eprintln!(
        "  crawlscope v{} - SEO audits for crawl exports\n",
        env!("CARGO_PKG_VERSION")
    );
}
