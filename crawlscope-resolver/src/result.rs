use crate::record::RedirectRecord;
use serde::{Deserialize, Serialize};

/// Why a chain walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainTerminal {
    /// The last target is not itself a redirect source
    EndsOutsideMap,
    /// The walk came back to a URL already on its path
    Loop,
    /// The hop bound was hit before either of the above
    MaxHopsReached,
}

impl ChainTerminal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTerminal::EndsOutsideMap => "ends_outside_map",
            ChainTerminal::Loop => "loop",
            ChainTerminal::MaxHopsReached => "max_hops_reached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    pub source_url: String,
    pub hop_count: usize,
    /// Starts with `source_url`. For a loop the repeated URL closes the path.
    pub path: Vec<String>,
    pub terminal: ChainTerminal,
}

impl ChainResult {
    pub fn is_loop(&self) -> bool {
        self.terminal == ChainTerminal::Loop
    }

    pub fn final_url(&self) -> &str {
        self.path
            .last()
            .map(String::as_str)
            .unwrap_or(self.source_url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopResult {
    pub source_url: String,
    pub path: Vec<String>,
}

impl From<&ChainResult> for LoopResult {
    fn from(chain: &ChainResult) -> Self {
        Self {
            source_url: chain.source_url.clone(),
            path: chain.path.clone(),
        }
    }
}

/// Everything one resolver pass produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectAnalysis {
    pub total_redirects: usize,
    /// One entry per source URL, in map order
    pub chains: Vec<ChainResult>,
    pub long_chains: Vec<ChainResult>,
    pub loops: Vec<LoopResult>,
    pub temporary: Vec<RedirectRecord>,
    pub slow: Vec<RedirectRecord>,
}

impl RedirectAnalysis {
    pub fn chain_for(&self, source_url: &str) -> Option<&ChainResult> {
        self.chains.iter().find(|c| c.source_url == source_url)
    }

    pub fn has_issues(&self) -> bool {
        !(self.long_chains.is_empty()
            && self.loops.is_empty()
            && self.temporary.is_empty()
            && self.slow.is_empty())
    }
}
