// Crawl export ingestion: CSV rows parsed once into typed records

use crate::error::{AuditError, Result};
use csv::StringRecord;
use crawlscope_resolver::{RedirectRecord, RedirectStatus};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const ADDRESS_COLUMN: &str = "Address";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Html,
    Redirect,
    Image,
    Asset,
    Other,
}

/// One crawled URL. Columns missing from the export take their default;
/// blank or malformed numbers read as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlRow {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Content Type")]
    pub content_type: String,
    #[serde(rename = "Status Code", deserialize_with = "lenient_status")]
    pub status_code: u16,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Redirect URL")]
    pub redirect_url: String,
    #[serde(rename = "Redirect Type")]
    pub redirect_type: String,
    #[serde(rename = "Response Time", deserialize_with = "lenient_decimal")]
    pub response_time: f64,
    #[serde(rename = "Word Count", deserialize_with = "lenient_count")]
    pub word_count: u32,
    #[serde(rename = "Text Ratio", deserialize_with = "lenient_decimal")]
    pub text_ratio: f64,
    #[serde(rename = "Title 1")]
    pub title: String,
    #[serde(rename = "Title 1 Length", deserialize_with = "lenient_count")]
    pub title_length: u32,
    #[serde(rename = "Meta Description 1")]
    pub meta_description: String,
    #[serde(rename = "Meta Description 1 Length", deserialize_with = "lenient_count")]
    pub meta_description_length: u32,
    #[serde(rename = "H1-1")]
    pub h1: String,
    #[serde(rename = "H2-1")]
    pub h2_first: String,
    #[serde(rename = "H2-2")]
    pub h2_second: String,
    #[serde(rename = "Canonical Link Element 1")]
    pub canonical: String,
    #[serde(rename = "Outlinks", deserialize_with = "lenient_count")]
    pub outlinks: u32,
    #[serde(rename = "Unique Outlinks", deserialize_with = "lenient_count")]
    pub unique_outlinks: u32,
    #[serde(rename = "Inlinks", deserialize_with = "lenient_count")]
    pub inlinks: u32,
    #[serde(rename = "Unique Inlinks", deserialize_with = "lenient_count")]
    pub unique_inlinks: u32,
    #[serde(rename = "Crawl Depth", deserialize_with = "lenient_count")]
    pub crawl_depth: u32,
    #[serde(rename = "Hash")]
    pub hash: String,
}

impl CrawlRow {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> ResourceKind {
        let content_type = self.content_type.to_lowercase();
        if content_type.contains("text/html") {
            ResourceKind::Html
        } else if self.redirect_status().is_some() {
            ResourceKind::Redirect
        } else if content_type.contains("image") {
            ResourceKind::Image
        } else if content_type.contains("css") || content_type.contains("javascript") {
            ResourceKind::Asset
        } else {
            ResourceKind::Other
        }
    }

    pub fn is_html(&self) -> bool {
        self.kind() == ResourceKind::Html
    }

    pub fn redirect_status(&self) -> Option<RedirectStatus> {
        RedirectStatus::from_code(self.status_code)
    }

    /// A row redirects when its status says so or when the crawler recorded a
    /// target for it, even if the status column was unreadable.
    pub fn is_redirect(&self) -> bool {
        self.redirect_status().is_some() || !self.redirect_url.is_empty()
    }

    pub fn to_redirect_record(&self) -> Option<RedirectRecord> {
        if !self.is_redirect() {
            return None;
        }
        Some(RedirectRecord {
            source_url: self.address.clone(),
            target_url: self.redirect_url.clone(),
            status: self.redirect_status(),
            response_time_seconds: self.response_time,
        })
    }

    pub fn h2_count(&self) -> usize {
        [&self.h2_first, &self.h2_second]
            .iter()
            .filter(|h| !h.trim().is_empty())
            .count()
    }
}

/// Per-kind row totals for the report header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindCounts {
    pub total: usize,
    pub html: usize,
    pub redirects: usize,
    pub images: usize,
    pub assets: usize,
    pub other: usize,
}

/// A fully loaded crawl export.
#[derive(Debug, Clone, Default)]
pub struct CrawlExport {
    source: Option<PathBuf>,
    rows: Vec<CrawlRow>,
    skipped_rows: usize,
    degraded_rows: usize,
}

impl CrawlExport {
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading crawl export from {}", path.display());
        let file = File::open(path)?;
        let mut export = Self::from_reader(file)?;
        export.source = Some(path.to_path_buf());
        Ok(export)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if !headers.iter().any(|h| h == ADDRESS_COLUMN) {
            return Err(AuditError::MissingColumn(ADDRESS_COLUMN.to_string()));
        }
        debug!("Export columns: {}", headers.len());

        let mut rows = Vec::new();
        let mut skipped_rows = 0;
        let mut degraded_rows = 0;
        for record in csv_reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let fields = match StringRecord::from_byte_record(record) {
                Ok(fields) => fields,
                Err(err) => {
                    warn!("Row on line {} is not valid UTF-8, decoding lossily", line);
                    degraded_rows += 1;
                    StringRecord::from_byte_record_lossy(err.into_byte_record())
                }
            };

            let row: CrawlRow = fields.deserialize(Some(&headers))?;
            if row.address.is_empty() {
                warn!("Skipping row on line {} with empty Address", line);
                skipped_rows += 1;
                continue;
            }
            rows.push(row);
        }

        info!(
            "Loaded {} rows ({} skipped, {} with invalid UTF-8)",
            rows.len(),
            skipped_rows,
            degraded_rows
        );
        Ok(Self {
            source: None,
            rows,
            skipped_rows,
            degraded_rows,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn rows(&self) -> &[CrawlRow] {
        &self.rows
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Rows kept after replacing invalid UTF-8 with U+FFFD
    pub fn degraded_rows(&self) -> usize {
        self.degraded_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn redirect_records(&self) -> Vec<RedirectRecord> {
        self.rows
            .iter()
            .filter_map(CrawlRow::to_redirect_record)
            .collect()
    }

    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts {
            total: self.rows.len(),
            ..Default::default()
        };
        for row in &self.rows {
            match row.kind() {
                ResourceKind::Html => counts.html += 1,
                ResourceKind::Redirect => counts.redirects += 1,
                ResourceKind::Image => counts.images += 1,
                ResourceKind::Asset => counts.assets += 1,
                ResourceKind::Other => counts.other += 1,
            }
        }
        counts
    }
}

/// Parse a count column. Accepts "12" and "12.0"; anything else is 0.
pub fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n as u32,
        _ => 0,
    }
}

/// Parse a decimal column such as response time or text ratio; anything
/// unreadable is 0.0.
pub fn parse_decimal(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_count).unwrap_or(0))
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(parse_count)
        .and_then(|n| u16::try_from(n).ok())
        .unwrap_or(0))
}

fn lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_decimal).unwrap_or(0.0))
}
