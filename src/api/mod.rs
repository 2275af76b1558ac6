//! Analytics API access - typed client for the remote music insights service.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - validated types the rest of the crate uses
//! - **DTOs** (`dto.rs`) - exact response shapes
//! - **Adapter** (`adapter.rs`) - schema validation, DTO -> domain
//! - **Client** (`client.rs`) - reqwest client, one method per endpoint
//! - **Traits** (`traits.rs`) - the `InsightsApi` seam for mocking
//!
//! A malformed response surfaces as `ApiError::Validation` at the boundary
//! instead of a silently defaulted field somewhere in rendering.

mod adapter;
mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::InsightsClient;
pub use domain::{
    Album, ApiError, Artist, ArtistRef, ChartSnapshot, Genre, GenreComparison, GenreShares, Image,
    KpiStats, Market, Page, Playlist, SearchKind, SearchResponse, Track,
};
pub use traits::InsightsApi;
