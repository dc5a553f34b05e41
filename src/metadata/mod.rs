//! Metadata lookup collaborators
//!
//! Each supported platform with a queryable API gets a client implementing
//! [`MetadataLookup`]. The pipeline consumes the trait, never a concrete
//! client, so tests substitute mock lookups.

mod catalog;
mod regional;

pub use catalog::CatalogClient;
pub use regional::RegionalClient;

use crate::error::Result;
use crate::types::TrackMetadata;
use async_trait::async_trait;

/// Resolve an identifier (URL or bare id) to normalized track metadata
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Look up metadata for the given identifier.
    ///
    /// Returns [`Error::MetadataLookup`](crate::error::Error::MetadataLookup)
    /// when the platform API cannot be reached or the track does not exist.
    async fn lookup(&self, identifier: &str) -> Result<TrackMetadata>;
}
