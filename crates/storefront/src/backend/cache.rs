//! Cache value wrapper for catalog reads.

use std::collections::HashMap;
use std::sync::Arc;

use maison_core::{Brand, Category, Product};

/// Values stored in the catalog cache, keyed by query-shaped strings.
///
/// Wrapped in `Arc` so cache hits are cheap clones.
#[derive(Clone)]
pub enum CacheValue {
    Categories(Arc<Vec<Category>>),
    Brands(Arc<Vec<Brand>>),
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
    Settings(Arc<HashMap<String, String>>),
}
