use anyhow::Result;
use tradepost_application::fetch_categories;
use tradepost_core::listing::ListingId;

use super::listing_line;
use crate::bootstrap::App;

pub async fn show(app: &App, id: ListingId) -> Result<()> {
    let listing = app.listings().fetch_listing_details(id).await?;

    println!("{}", listing_line(&listing));
    if !listing.description.is_empty() {
        println!("\n{}\n", listing.description);
    }
    if let Some(condition) = &listing.item_condition {
        println!("  condition:    {}", condition);
    }
    if let Some(availability) = &listing.availability {
        println!("  availability: {}", availability);
    }
    if let Some(category) = &listing.category {
        println!("  category:     {}", category.name);
    }
    match &listing.seller {
        Some(seller) => println!("  seller:       {} (user #{})", seller.username, seller.user_id),
        None => println!("  seller:       user #{}", listing.seller_id),
    }
    println!("  status:       {} ({} views)", listing.status, listing.views_count);
    if let Some(image) = listing.primary_image() {
        println!("  image:        {}", image.image_path);
    }
    Ok(())
}

pub async fn categories(app: &App, is_skill: Option<bool>) -> Result<()> {
    let categories = fetch_categories(app.transport.as_ref(), is_skill).await?;
    for category in categories.iter().filter(|c| c.is_active) {
        let kind = if category.is_skill_category { "skill" } else { "item" };
        println!("{:>4}  {} [{}]", category.id, category.name, kind);
    }
    Ok(())
}
