pub mod config;
pub mod error;
pub mod map;
pub mod record;
pub mod resolver;
pub mod result;

pub use config::{DuplicatePolicy, ResolverConfig};
pub use error::ResolverError;
pub use map::RedirectMap;
pub use record::{RedirectRecord, RedirectStatus};
pub use resolver::Resolver;
pub use result::{ChainResult, ChainTerminal, LoopResult, RedirectAnalysis};
