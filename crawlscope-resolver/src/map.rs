use crate::config::DuplicatePolicy;
use crate::error::{ResolverError, Result};
use crate::record::RedirectRecord;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Source URL to declared redirect target, built once per analysis pass.
///
/// Sources iterate in the order they were first inserted. Under
/// `DuplicatePolicy::LastWriteWins` a repeated source keeps its original
/// position but takes the later target.
#[derive(Debug, Clone, Default)]
pub struct RedirectMap {
    targets: HashMap<String, String>,
    order: Vec<String>,
}

impl RedirectMap {
    pub fn build(records: &[RedirectRecord], policy: DuplicatePolicy) -> Result<Self> {
        let mut map = RedirectMap::default();

        for record in records {
            match map.targets.get_mut(&record.source_url) {
                Some(existing) => match policy {
                    DuplicatePolicy::Reject => {
                        return Err(ResolverError::DuplicateSource(record.source_url.clone()));
                    }
                    DuplicatePolicy::LastWriteWins => {
                        warn!(
                            "Duplicate redirect source {}: {} replaced by {}",
                            record.source_url, existing, record.target_url
                        );
                        *existing = record.target_url.clone();
                    }
                },
                None => {
                    map.order.push(record.source_url.clone());
                    map.targets
                        .insert(record.source_url.clone(), record.target_url.clone());
                }
            }
        }

        debug!(
            "Built redirect map with {} sources ({} policy)",
            map.len(),
            policy.as_str()
        );
        Ok(map)
    }

    pub fn target(&self, source: &str) -> Option<&str> {
        self.targets.get(source).map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.targets.contains_key(url)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
