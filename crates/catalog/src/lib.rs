//! Catalog access for marquee.
//!
//! [`CatalogClient`] is the seam the search core depends on; [`TmdbClient`]
//! is the production implementation.

mod client;
mod error;
mod item;
pub mod tmdb;

pub use client::CatalogClient;
pub use error::{FetchError, Result};
pub use item::Item;
pub use tmdb::TmdbClient;
