use url::form_urlencoded;

use super::filters::SearchFilterState;

/// Query parameter names shared by `GET /search` and the address bar.
pub mod keys {
    pub const QUERY: &str = "q";
    pub const CATEGORY_ID: &str = "category_id";
    pub const ITEM_CONDITION: &str = "item_condition";
    pub const MIN_PRICE: &str = "min_price";
    pub const MAX_PRICE: &str = "max_price";
    pub const IS_SKILL_SHARING: &str = "is_skill_sharing";
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Parses a form-urlencoded query string; a leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, space as `+`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl std::fmt::Display for SearchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Derives the canonical request parameters for a filter state.
///
/// Order is fixed: `q`, `category_id`, `item_condition`, `min_price`,
/// `max_price`, `is_skill_sharing`. Item-only filters are dropped in skill
/// context, and prices that are not finite numbers are dropped.
pub fn derive_search_params(filters: &SearchFilterState) -> SearchParams {
    let mut params = SearchParams::default();

    if !filters.query.is_empty() {
        params.push(keys::QUERY, filters.query.as_str());
    }
    if filters.category_id != 0 {
        params.push(keys::CATEGORY_ID, filters.category_id.to_string());
    }

    if !filters.is_skill_context() {
        if !filters.condition.is_empty() {
            params.push(keys::ITEM_CONDITION, filters.condition.as_str());
        }
        if let Some(min) = canonical_price(&filters.min_price) {
            params.push(keys::MIN_PRICE, min);
        }
        if let Some(max) = canonical_price(&filters.max_price) {
            params.push(keys::MAX_PRICE, max);
        }
    }

    if let Some(skills) = filters.skill_context {
        params.push(keys::IS_SKILL_SHARING, skills.to_string());
    }

    params
}

/// "10" -> "10", "10.50" -> "10.5", "abc" -> None.
fn canonical_price(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.to_string())
}
