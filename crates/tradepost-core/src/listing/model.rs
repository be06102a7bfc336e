use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{UserId, UserIdentity};

pub type ListingId = i64;
pub type CategoryId = i64;

/// A marketplace listing: either an item for sale or an offered skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "listing_id")]
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub search_keywords: Option<String>,
    /// Item price. Skills use `rate` instead.
    #[serde(default)]
    pub price: Option<f64>,
    pub category_id: CategoryId,
    /// One of `new`, `like_new`, `good`, `fair`, `poor`, `used`.
    #[serde(default)]
    pub item_condition: Option<String>,
    #[serde(default)]
    pub is_skill_sharing: bool,
    #[serde(default)]
    pub rate: Option<f64>,
    /// `hourly` or `fixed`.
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    pub seller_id: UserId,
    #[serde(default)]
    pub status: String,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub seller: Option<UserIdentity>,
    #[serde(default)]
    pub buyer: Option<UserSummary>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Listing {
    /// The primary image, or the first one by display order.
    pub fn primary_image(&self) -> Option<&ListingImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.iter().min_by_key(|image| image.display_order))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingImage {
    pub image_id: i64,
    pub listing_id: ListingId,
    pub image_path: String,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

/// Listing reference embedded in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingMinimal {
    #[serde(rename = "listing_id")]
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub is_skill_sharing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_skill_category: bool,
}

fn default_true() -> bool {
    true
}
