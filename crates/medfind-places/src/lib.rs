//! Client for the nearby places search service.

pub mod client;
pub mod error;
pub mod normalize;
pub mod search;
pub mod sweep;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use search::PlacesSearch;
pub use sweep::sweep;
