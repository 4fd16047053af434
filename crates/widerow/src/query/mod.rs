//! Stateful query builders: primary-key interval scans and inverted-index
//! searches. Configuration chains are synchronous and side-effect-free;
//! suspension happens only at the execute step, one round-trip per call.

mod range;
mod search;

#[cfg(test)]
mod tests;

pub use range::{RangeResult, RangeScan};
pub use search::{SearchResult, SearchScan};

/// Default page size for interval scans when the caller supplies no limit
/// or a non-positive one.
pub const DEFAULT_RANGE_LIMIT: u32 = 20;

/// Default page size for search queries when the caller supplies no limit.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
