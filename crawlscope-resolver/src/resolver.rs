use crate::config::ResolverConfig;
use crate::error::Result;
use crate::map::RedirectMap;
use crate::record::RedirectRecord;
use crate::result::{ChainResult, ChainTerminal, LoopResult, RedirectAnalysis};
use tracing::{debug, info};

#[derive(Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve and classify every redirect source in `records`.
    pub fn resolve(&self, records: &[RedirectRecord]) -> Result<RedirectAnalysis> {
        let map = RedirectMap::build(records, self.config.duplicate_policy)?;
        let mut analysis = RedirectAnalysis {
            total_redirects: records.len(),
            ..Default::default()
        };

        for source in map.sources() {
            let chain = self.walk(&map, source);

            if chain.is_loop() {
                debug!("Redirect loop from {}: {}", source, chain.path.join(" -> "));
                analysis.loops.push(LoopResult::from(&chain));
            } else if chain.hop_count > self.config.long_chain_hop_threshold {
                debug!("Long redirect chain from {} ({} hops)", source, chain.hop_count);
                analysis.long_chains.push(chain.clone());
            }
            analysis.chains.push(chain);
        }

        for record in records {
            if record.is_temporary() {
                analysis.temporary.push(record.clone());
            }
            if record.response_time_seconds > self.config.slow_response_threshold_seconds {
                analysis.slow.push(record.clone());
            }
        }

        info!(
            "Resolved {} redirect sources: {} long chains, {} loops, {} temporary, {} slow",
            map.len(),
            analysis.long_chains.len(),
            analysis.loops.len(),
            analysis.temporary.len(),
            analysis.slow.len()
        );

        Ok(analysis)
    }

    /// Follow `source` through `map` until it leaves the map, revisits its own
    /// path, or `max_hops` hops have been taken.
    pub fn walk(&self, map: &RedirectMap, source: &str) -> ChainResult {
        let mut path = vec![source.to_string()];
        let mut current = map.target(source).unwrap_or(source);
        let mut hops = 1;

        let terminal = loop {
            let Some(next) = map.target(current) else {
                break ChainTerminal::EndsOutsideMap;
            };
            if hops >= self.config.max_hops {
                break ChainTerminal::MaxHopsReached;
            }
            if path.iter().any(|url| url == current) {
                break ChainTerminal::Loop;
            }
            path.push(current.to_string());
            current = next;
            hops += 1;
        };
        path.push(current.to_string());

        ChainResult {
            source_url: source.to_string(),
            hop_count: hops,
            path,
            terminal,
        }
    }
}
