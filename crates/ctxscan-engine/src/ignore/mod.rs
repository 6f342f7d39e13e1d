//! Ignore subsystem: pattern discovery, compiled filters, and the cached
//! resolver that chooses between automatic and global policies.

pub mod collector;
pub mod filter;
pub mod key;
pub mod resolver;

pub use collector::{parse_patterns, GitignorePatternCollector, GitignorePatternMap};
pub use filter::IgnoreFilter;
pub use key::IgnoreCacheKey;
pub use resolver::{
    scope_pattern, IgnoreRuleResolver, PatternProvenance, ResolvedIgnore, ResolverStats,
};
