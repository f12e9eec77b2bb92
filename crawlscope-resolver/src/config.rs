use crate::error::{ResolverError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LONG_CHAIN_HOP_THRESHOLD: usize = 3;
pub const DEFAULT_MAX_HOPS: usize = 10;
pub const DEFAULT_SLOW_RESPONSE_THRESHOLD_SECS: f64 = 1.0;

/// What to do when the same source URL shows up in more than one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later record replaces the earlier target
    #[default]
    LastWriteWins,
    /// Map construction fails on the first repeated source
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::LastWriteWins => "last_write_wins",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub long_chain_hop_threshold: usize,
    pub max_hops: usize,
    pub slow_response_threshold_seconds: f64,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            long_chain_hop_threshold: DEFAULT_LONG_CHAIN_HOP_THRESHOLD,
            max_hops: DEFAULT_MAX_HOPS,
            slow_response_threshold_seconds: DEFAULT_SLOW_RESPONSE_THRESHOLD_SECS,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_long_chain_hop_threshold(mut self, hops: usize) -> Self {
        self.long_chain_hop_threshold = hops;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_slow_response_threshold(mut self, seconds: f64) -> Self {
        self.slow_response_threshold_seconds = seconds;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(ResolverError::InvalidConfig(
                "max_hops must be at least 1".to_string(),
            ));
        }
        let slow = self.slow_response_threshold_seconds;
        if slow.is_nan() || slow < 0.0 {
            return Err(ResolverError::InvalidConfig(format!(
                "slow_response_threshold_seconds must be a non-negative number, got {}",
                slow
            )));
        }
        Ok(())
    }
}
