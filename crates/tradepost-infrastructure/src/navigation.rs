//! Host-side `Navigator` and `AddressBar` for non-browser front ends.

use std::sync::{Mutex, RwLock};

use tradepost_core::navigation::{AddressBar, Navigator};

/// Logs every route push and remembers them in order.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    history: Mutex<Vec<String>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn last_route(&self) -> Option<String> {
        self.history().pop()
    }
}

impl Navigator for LoggingNavigator {
    fn push(&self, route: &str) {
        tracing::info!("[Navigation] -> {}", route);
        if let Ok(mut history) = self.history.lock() {
            history.push(route.to_string());
        }
    }
}

/// Query string held in memory.
#[derive(Debug, Default)]
pub struct MemoryAddressBar {
    query: RwLock<String>,
}

impl MemoryAddressBar {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial: String = initial.into();
        Self {
            query: RwLock::new(initial.trim_start_matches('?').to_string()),
        }
    }
}

impl AddressBar for MemoryAddressBar {
    fn query(&self) -> String {
        self.query
            .read()
            .map(|query| query.clone())
            .unwrap_or_default()
    }

    fn replace_query(&self, query: &str) {
        if let Ok(mut current) = self.query.write() {
            *current = query.trim_start_matches('?').to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_records_routes() {
        let navigator = LoggingNavigator::new();
        navigator.push("/login");
        navigator.push("/messages");
        assert_eq!(navigator.history(), vec!["/login", "/messages"]);
        assert_eq!(navigator.last_route().as_deref(), Some("/messages"));
    }

    #[test]
    fn test_address_bar_strips_question_mark() {
        let bar = MemoryAddressBar::new("?q=desk");
        assert_eq!(bar.query(), "q=desk");
        bar.replace_query("q=lamp&is_skill_sharing=false");
        assert_eq!(bar.query(), "q=lamp&is_skill_sharing=false");
    }
}
