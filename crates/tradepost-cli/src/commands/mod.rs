pub mod auth;
pub mod listings;
pub mod messaging;
pub mod search;

use tradepost_core::listing::Listing;

/// One-line summary used by `search` and `listing`.
pub(crate) fn listing_line(listing: &Listing) -> String {
    let price = match (listing.price, listing.rate) {
        (Some(price), _) => format!("${:.2}", price),
        (None, Some(rate)) => match listing.rate_type.as_deref() {
            Some(rate_type) => format!("${:.2}/{}", rate, rate_type),
            None => format!("${:.2}", rate),
        },
        (None, None) => "-".to_string(),
    };
    let kind = if listing.is_skill_sharing { "skill" } else { "item" };
    format!("#{:<6} [{}] {}  {}", listing.id, kind, listing.title, price)
}
