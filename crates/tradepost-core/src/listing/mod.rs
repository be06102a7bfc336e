//! Listing and category records returned by the marketplace API.

mod model;
mod state;

pub use model::{
    Category, CategoryId, Listing, ListingId, ListingImage, ListingMinimal, UserSummary,
};
pub use state::ListingState;
