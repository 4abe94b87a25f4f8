//! Curated fallback content.
//!
//! Every browsing step serves this static content when the backend is
//! unreachable or a table is still empty, so a freshly provisioned site
//! renders a complete gateway instead of a blank page. Image paths point
//! into the frontend's bundled assets.

use serde::Serialize;

/// A gateway category card.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackCategory {
    pub name: String,
    pub slug: String,
    pub image: String,
}

/// A brand card for the selection grid.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackBrand {
    pub name: String,
    pub logo: String,
}

/// A bestseller strip entry.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackBestseller {
    pub name: String,
    pub brand: String,
    pub price: u32,
    pub image: String,
}

/// The curated category gateway.
#[must_use]
pub fn categories() -> Vec<FallbackCategory> {
    [
        ("Men", "men", "/assets/icon-men.jpg"),
        ("Women", "women", "/assets/icon-women.jpg"),
        ("Girls", "girls", "/assets/icon-girls.jpg"),
        ("Boys", "boys", "/assets/icon-boys.jpg"),
        ("Travel & Trolley", "travel-trolley", "/assets/icon-travel.jpg"),
        ("Home Collection", "home-collection", "/assets/icon-home.jpg"),
    ]
    .into_iter()
    .map(|(name, slug, image)| FallbackCategory {
        name: name.to_string(),
        slug: slug.to_string(),
        image: image.to_string(),
    })
    .collect()
}

/// The curated maison list.
#[must_use]
pub fn brands() -> Vec<FallbackBrand> {
    [
        ("Louis Vuitton", "/assets/logo-lv.png"),
        ("Gucci", "/assets/logo-gucci.png"),
        ("Hermès", "/assets/logo-hermes.png"),
        ("Prada", "/assets/logo-prada.png"),
        ("Dior", "/assets/logo-dior.png"),
        ("Chanel", "/assets/logo-chanel.png"),
        ("Versace", "/assets/logo-versace.png"),
    ]
    .into_iter()
    .map(|(name, logo)| FallbackBrand {
        name: name.to_string(),
        logo: logo.to_string(),
    })
    .collect()
}

/// The curated bestseller strip.
#[must_use]
pub fn bestsellers() -> Vec<FallbackBestseller> {
    [
        ("Classic Leather Bag", "Louis Vuitton", 2450, "/assets/bestseller-bag.jpg"),
        ("Signature Watch", "Rolex", 8900, "/assets/bestseller-watch.jpg"),
        ("Silk Scarf", "Hermès", 580, "/assets/bestseller-scarf.jpg"),
        ("Designer Sunglasses", "Gucci", 420, "/assets/bestseller-sunglasses.jpg"),
        ("Leather Wallet", "Prada", 650, "/assets/bestseller-wallet.jpg"),
        ("Diamond Ring", "Cartier", 12500, "/assets/bestseller-ring.jpg"),
    ]
    .into_iter()
    .map(|(name, brand, price, image)| FallbackBestseller {
        name: name.to_string(),
        brand: brand.to_string(),
        price,
        image: image.to_string(),
    })
    .collect()
}

/// Placeholder shown when a product page cannot be resolved.
#[must_use]
pub fn placeholder_product() -> FallbackBestseller {
    FallbackBestseller {
        name: "Classic Leather Bag".to_string(),
        brand: "Louis Vuitton".to_string(),
        price: 2450,
        image: "/assets/product-bag.jpg".to_string(),
    }
}
