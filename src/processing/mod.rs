//! Lookup row processing logic.
//!
//! This module contains the row list that ties validation and lookups together:
//! - [`list`] - rows, commits and lookup results

mod list;

// Re-export public types
pub use list::{IpLookupList, PendingLookup};
