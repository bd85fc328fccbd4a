//! ipapi.co geolocation lookups.
//!
//! This module handles everything that talks to the lookup service:
//! - [`client`] - HTTP requests and response interpretation
//! - [`cache`] - de-duplication and caching of lookups
//! - [`error`] - lookup failure type

mod cache;
mod client;
mod error;

// Re-export public types and functions
pub use cache::LookupCache;
pub use client::{interpret_response, IpApiClient, Locator, LookupFuture};
pub use error::LookupError;
