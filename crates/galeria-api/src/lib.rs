//! Collection API glue for the artwork browsing site.
//!
//! Talks to the museum's public collection API and adapts its raw artwork
//! records into the shape the display layer expects.

pub mod artwork;
pub mod client;

pub use artwork::{build_artwork, thumbnail_url};
pub use client::{ApiError, CollectionClient, UpstreamResponse};
