//! Domain models for IP geolocation lookups.
//!
//! This module contains the core data structures used throughout the application:
//! - [`ReservedBlock`] - special-use IPv4 ranges and CIDR helpers
//! - [`IpLookupRow`] - one address entry and its lookup state
//! - [`IpLookupResult`] - geolocation returned by the lookup service

mod ipv4;
mod lookup;

// Re-export public types
pub use ipv4::{
    get_cidr_mask, in_cidr, ipv4_to_u32, reserved_block, reserved_reason, ReservedBlock,
    MAX_LENGTH, RESERVED_BLOCKS,
};
pub use lookup::{IpLookupResult, IpLookupRow, LookupStatus, RowUpdate};
