//! Shared domain types.

mod catalog;
mod email;
mod id;
mod price;
mod slug;
mod status;

pub use catalog::{Brand, Category, Product, Setting};
pub use email::{Email, EmailError};
pub use id::{BrandId, CategoryId, ProductId, SettingId, UserId};
pub use price::Price;
pub use slug::{product_name_from_file, slugify, unique_slug};
pub use status::ProductStatus;
