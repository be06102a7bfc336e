//! Front-end navigation seams.
//!
//! Stores never render or route themselves; they signal the host through
//! these traits.

/// Route shown when the session has expired or no user is logged in.
pub const LOGIN_ROUTE: &str = "/login";

/// Client-side router.
pub trait Navigator: Send + Sync {
    /// Navigates to `route`, e.g. [`LOGIN_ROUTE`].
    fn push(&self, route: &str);
}

/// The current location's query string (the part after `?`).
pub trait AddressBar: Send + Sync {
    /// Returns the query string without the leading `?`.
    fn query(&self) -> String;

    /// Replaces the query string in place, without adding a history entry.
    fn replace_query(&self, query: &str);
}
