//! Product lifecycle status.

use serde::{Deserialize, Serialize};

/// Explicit product lifecycle state.
///
/// Bulk upload creates `Draft` rows; the admin edit form publishes them.
/// This replaces inferring "draft" from `is_active == false && price == 0`,
/// which misclassified legitimate free or deactivated products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Published,
}

impl ProductStatus {
    /// Whether this is a draft awaiting details.
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Draft).unwrap(),
            "\"draft\""
        );
        let status: ProductStatus = serde_json::from_str("\"published\"").unwrap();
        assert_eq!(status, ProductStatus::Published);
    }

    #[test]
    fn test_default_is_published() {
        // Rows predating the status column deserialize as published.
        assert_eq!(ProductStatus::default(), ProductStatus::Published);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for status in [ProductStatus::Draft, ProductStatus::Published] {
            assert_eq!(status.to_string().parse::<ProductStatus>().unwrap(), status);
        }
    }
}
