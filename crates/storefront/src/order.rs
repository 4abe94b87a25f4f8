//! Order links for the product page.
//!
//! There is no cart or checkout; ordering happens over WhatsApp or
//! Instagram. Links are assembled from site settings so the shop can swap
//! contact channels without a deploy.

use std::collections::HashMap;

use maison_core::Product;
use serde::Serialize;

/// Contact links rendered on the product detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLinks {
    /// WhatsApp deep link with a prefilled inquiry, when a number is set.
    pub whatsapp: Option<String>,
    /// Instagram profile URL, when set.
    pub instagram: Option<String>,
}

/// Build the order links for a product.
///
/// The WhatsApp message names the product and carries its public URL so
/// the shop sees what is being asked about. The number is used as stored
/// (digits with country code, no `+`).
#[must_use]
pub fn order_links(
    settings: &HashMap<String, String>,
    product: &Product,
    base_url: &str,
) -> OrderLinks {
    let whatsapp = settings
        .get("whatsapp_number")
        .filter(|number| !number.is_empty())
        .map(|number| {
            let message = format!(
                "Hello! I'm interested in this product: {} ({}/products/{})",
                product.name,
                base_url.trim_end_matches('/'),
                product.slug
            );
            format!("https://wa.me/{number}?text={}", urlencoding::encode(&message))
        });

    let instagram = settings
        .get("instagram_url")
        .filter(|url| !url.is_empty())
        .cloned();

    OrderLinks { whatsapp, instagram }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maison_core::{Price, ProductId, ProductStatus};

    fn product(name: &str, slug: &str) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            price: Price::from_major(2450),
            original_price: None,
            image_url: None,
            images: vec![],
            status: ProductStatus::Published,
            is_active: true,
            is_featured: false,
            is_bestseller: false,
            stock_quantity: 1,
            brand_id: None,
            category_id: None,
            created_at: None,
        }
    }

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let settings = settings(&[("whatsapp_number", "97144447777")]);
        let links = order_links(
            &settings,
            &product("Classic Bag", "classic-bag"),
            "https://shop.example.com/",
        );

        let link = links.whatsapp.unwrap();
        assert!(link.starts_with("https://wa.me/97144447777?text="));
        assert!(link.contains("Classic%20Bag"));
        assert!(link.contains("shop.example.com%2Fproducts%2Fclassic-bag"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_missing_or_blank_settings_yield_no_links() {
        let links = order_links(
            &settings(&[("whatsapp_number", ""), ("instagram_url", "")]),
            &product("Bag", "bag"),
            "https://shop.example.com",
        );
        assert_eq!(links.whatsapp, None);
        assert_eq!(links.instagram, None);
    }

    #[test]
    fn test_instagram_link_passthrough() {
        let settings = settings(&[("instagram_url", "https://instagram.com/maisonatelier")]);
        let links = order_links(&settings, &product("Bag", "bag"), "https://shop.example.com");
        assert_eq!(
            links.instagram.as_deref(),
            Some("https://instagram.com/maisonatelier")
        );
    }
}
