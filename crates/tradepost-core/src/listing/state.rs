use super::model::Listing;

/// Published state of the listing detail view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    pub current: Option<Listing>,
    pub loading: bool,
    pub error: Option<String>,
}
