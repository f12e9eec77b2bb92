// Per-page SEO checks over HTML rows of a crawl export

use crate::config::PageThresholds;
use crate::data::CrawlRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

const SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "value", rename_all = "snake_case")]
pub enum PageIssue {
    LowWordCount(u32),
    LowTextRatio(f64),
    MissingH1,
    MissingH2,
    ShortMetaDescription(u32),
    LongMetaDescription(u32),
    ShortTitle(u32),
    LongTitle(u32),
    ExcessiveOutlinks(u32),
    Orphaned,
    FewInlinks(u32),
    DeepCrawlDepth(u32),
}

impl fmt::Display for PageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageIssue::LowWordCount(n) => write!(f, "Low word count: {}", n),
            PageIssue::LowTextRatio(r) => write!(f, "Low text ratio: {}%", r),
            PageIssue::MissingH1 => write!(f, "Missing H1"),
            PageIssue::MissingH2 => write!(f, "Missing H2 tags"),
            PageIssue::ShortMetaDescription(n) => {
                write!(f, "Short meta description: {} chars", n)
            }
            PageIssue::LongMetaDescription(n) => write!(f, "Long meta description: {} chars", n),
            PageIssue::ShortTitle(n) => write!(f, "Short title: {} chars", n),
            PageIssue::LongTitle(n) => write!(f, "Long title: {} chars", n),
            PageIssue::ExcessiveOutlinks(n) => write!(f, "Excessive outlinks: {}", n),
            PageIssue::Orphaned => write!(f, "Orphaned page (no inlinks)"),
            PageIssue::FewInlinks(n) => write!(f, "Very few inlinks: {}", n),
            PageIssue::DeepCrawlDepth(n) => write!(f, "Deep crawl depth: {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIssue {
    pub url: String,
    pub word_count: u32,
    pub text_ratio: f64,
    pub h1: String,
    pub h2_count: usize,
    pub meta_description_length: u32,
    pub title_length: u32,
    pub issues: Vec<PageIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIssue {
    pub url: String,
    pub canonical: String,
}

/// Values shared by more than one page, mapped to the pages sharing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub duplicate_titles: BTreeMap<String, Vec<String>>,
    pub duplicate_metas: BTreeMap<String, Vec<String>>,
    pub duplicate_hashes: BTreeMap<String, Vec<String>>,
    pub canonical_issues: Vec<CanonicalIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkIssue {
    pub url: String,
    pub outlinks: u32,
    pub unique_outlinks: u32,
    pub inlinks: u32,
    pub unique_inlinks: u32,
    pub crawl_depth: u32,
    pub issues: Vec<PageIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    pub link_issues: Vec<LinkIssue>,
    pub orphaned_pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotFoundPage {
    pub url: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaSnippet {
    pub url: String,
    pub length: u32,
    pub meta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaReport {
    pub missing: Vec<String>,
    pub short: Vec<MetaSnippet>,
    pub long: Vec<MetaSnippet>,
}

fn html_pages(rows: &[CrawlRow]) -> impl Iterator<Item = &CrawlRow> {
    rows.iter().filter(|row| row.is_html())
}

/// Thin or poorly structured pages. A page is listed once with every issue
/// it has.
pub fn analyze_thin_content(rows: &[CrawlRow], thresholds: &PageThresholds) -> Vec<ContentIssue> {
    let mut thin_pages = Vec::new();

    for page in html_pages(rows) {
        let mut issues = Vec::new();

        if page.word_count < thresholds.min_word_count {
            issues.push(PageIssue::LowWordCount(page.word_count));
        }
        if page.text_ratio < thresholds.min_text_ratio {
            issues.push(PageIssue::LowTextRatio(page.text_ratio));
        }
        if page.h1.trim().is_empty() {
            issues.push(PageIssue::MissingH1);
        }
        if page.h2_count() == 0 {
            issues.push(PageIssue::MissingH2);
        }
        if page.meta_description_length < thresholds.min_meta_description_length {
            issues.push(PageIssue::ShortMetaDescription(page.meta_description_length));
        }
        if page.meta_description_length > thresholds.max_meta_description_length {
            issues.push(PageIssue::LongMetaDescription(page.meta_description_length));
        }
        if page.title_length < thresholds.min_title_length {
            issues.push(PageIssue::ShortTitle(page.title_length));
        }
        if page.title_length > thresholds.max_title_length {
            issues.push(PageIssue::LongTitle(page.title_length));
        }

        if !issues.is_empty() {
            thin_pages.push(ContentIssue {
                url: page.address.clone(),
                word_count: page.word_count,
                text_ratio: page.text_ratio,
                h1: page.h1.clone(),
                h2_count: page.h2_count(),
                meta_description_length: page.meta_description_length,
                title_length: page.title_length,
                issues,
            });
        }
    }

    thin_pages
}

fn group_shared<'a, F>(rows: &'a [CrawlRow], key: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&'a CrawlRow) -> &'a str,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for page in html_pages(rows) {
        let value = key(page).trim();
        if !value.is_empty() {
            groups
                .entry(value.to_string())
                .or_default()
                .push(page.address.clone());
        }
    }
    groups.retain(|_, urls| urls.len() > 1);
    groups
}

pub fn analyze_duplicate_content(rows: &[CrawlRow]) -> DuplicateReport {
    let canonical_issues = html_pages(rows)
        .filter_map(|page| {
            let canonical = page.canonical.trim();
            let url = page.address.trim();
            (!canonical.is_empty() && canonical != url).then(|| CanonicalIssue {
                url: url.to_string(),
                canonical: canonical.to_string(),
            })
        })
        .collect();

    DuplicateReport {
        duplicate_titles: group_shared(rows, |page| page.title.as_str()),
        duplicate_metas: group_shared(rows, |page| page.meta_description.as_str()),
        duplicate_hashes: group_shared(rows, |page| page.hash.as_str()),
        canonical_issues,
    }
}

pub fn analyze_internal_links(rows: &[CrawlRow], thresholds: &PageThresholds) -> LinkReport {
    let mut report = LinkReport::default();
    let mut seen_orphans = HashSet::new();

    for page in html_pages(rows) {
        let mut issues = Vec::new();

        if page.outlinks > thresholds.max_outlinks {
            issues.push(PageIssue::ExcessiveOutlinks(page.outlinks));
        }
        if page.inlinks == 0 {
            issues.push(PageIssue::Orphaned);
        }
        if page.inlinks < thresholds.min_inlinks {
            issues.push(PageIssue::FewInlinks(page.inlinks));
        }
        if page.crawl_depth > thresholds.max_crawl_depth {
            issues.push(PageIssue::DeepCrawlDepth(page.crawl_depth));
        }

        if !issues.is_empty() {
            report.link_issues.push(LinkIssue {
                url: page.address.clone(),
                outlinks: page.outlinks,
                unique_outlinks: page.unique_outlinks,
                inlinks: page.inlinks,
                unique_inlinks: page.unique_inlinks,
                crawl_depth: page.crawl_depth,
                issues,
            });
        }

        if page.inlinks == 0 && seen_orphans.insert(page.address.as_str()) {
            report.orphaned_pages.push(page.address.clone());
        }
    }

    report
}

/// Every row answering 404, whatever its content type.
pub fn analyze_not_found(rows: &[CrawlRow]) -> Vec<NotFoundPage> {
    rows.iter()
        .filter(|row| row.status_code == 404)
        .map(|row| NotFoundPage {
            url: row.address.clone(),
            status: row.status.clone(),
        })
        .collect()
}

pub fn analyze_meta_descriptions(rows: &[CrawlRow], thresholds: &PageThresholds) -> MetaReport {
    let mut report = MetaReport::default();

    for page in html_pages(rows) {
        let meta = page.meta_description.trim();
        let length = page.meta_description_length;

        if meta.is_empty() || length == 0 {
            report.missing.push(page.address.clone());
        } else if length < thresholds.min_meta_description_length {
            report.short.push(MetaSnippet {
                url: page.address.clone(),
                length,
                meta: snippet(meta),
            });
        } else if length > thresholds.max_meta_description_length {
            report.long.push(MetaSnippet {
                url: page.address.clone(),
                length,
                meta: snippet(meta),
            });
        }
    }

    report
}

/// First 100 characters of `text`, with `...` appended when cut.
pub fn snippet(text: &str) -> String {
    truncate_chars(text, SNIPPET_CHARS)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
