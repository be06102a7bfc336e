use crate::listing::CategoryId;

use super::params::{SearchParams, keys};

/// User-editable search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilterState {
    pub query: String,
    /// 0 means all categories.
    pub category_id: CategoryId,
    /// Empty means any condition. Items only.
    pub condition: String,
    /// Empty means unbounded. Items only.
    pub min_price: String,
    pub max_price: String,
    /// `Some(true)` skills, `Some(false)` items, `None` not chosen yet.
    pub skill_context: Option<bool>,
}

impl SearchFilterState {
    pub fn is_skill_context(&self) -> bool {
        self.skill_context == Some(true)
    }

    /// Enters a context with every other filter back at its default.
    pub fn reset_for_context(&mut self, skill_context: bool) {
        *self = Self {
            skill_context: Some(skill_context),
            ..Self::default()
        };
    }

    /// Clears query and category, plus the item filters outside skill
    /// context. The context itself is kept.
    pub fn clear_active(&mut self) {
        self.query.clear();
        self.category_id = 0;
        if !self.is_skill_context() {
            self.condition.clear();
            self.min_price.clear();
            self.max_price.clear();
        }
    }

    /// Copies filters present in an address-bar query onto this state.
    ///
    /// `is_skill_sharing` is never read back; the page decides the context.
    /// A `category_id` that is not an integer is ignored.
    pub fn hydrate_from(&mut self, params: &SearchParams) {
        if let Some(query) = params.get(keys::QUERY) {
            self.query = query.to_string();
        }
        if let Some(raw) = params.get(keys::CATEGORY_ID) {
            match raw.trim().parse::<CategoryId>() {
                Ok(category_id) => self.category_id = category_id,
                Err(_) => {
                    tracing::warn!("[Search] Ignoring non-numeric category_id '{}' in URL", raw)
                }
            }
        }

        if !self.is_skill_context() {
            if let Some(condition) = params.get(keys::ITEM_CONDITION) {
                self.condition = condition.to_string();
            }
            if let Some(min) = params.get(keys::MIN_PRICE) {
                self.min_price = min.to_string();
            }
            if let Some(max) = params.get(keys::MAX_PRICE) {
                self.max_price = max.to_string();
            }
        }
    }

    /// Whether hydrating from `params` warrants a fresh search: the query
    /// must carry something besides the context flag.
    pub fn hydration_needs_search(params: &SearchParams) -> bool {
        params.iter().any(|(key, _)| key != keys::IS_SKILL_SHARING)
    }
}
