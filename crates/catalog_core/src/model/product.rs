//! Product record and its coded enums.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};

/// Storage-assigned product identifier.
pub type ProductId = i64;
pub type MerchantId = i64;

/// Listing state stored as a small integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    NotListed,
    Listed,
}

impl ProductStatus {
    pub fn code(self) -> i64 {
        match self {
            Self::NotListed => 0,
            Self::Listed => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NotListed),
            2 => Some(Self::Listed),
            _ => None,
        }
    }
}

/// Product kind. Only regular goods exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    #[default]
    Normal,
}

impl ProductType {
    pub fn code(self) -> i64 {
        match self {
            Self::Normal => 0,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Every simple product column except the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    /// May point to a category row that no longer exists.
    pub category_id: CategoryId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub subtitle: Option<String>,
    pub cover: Option<String>,
    pub description: Option<String>,
    pub status: ProductStatus,
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub sort: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One persisted `products` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: ProductFields,
}

#[cfg(test)]
mod tests {
    use super::{ProductStatus, ProductType};

    #[test]
    fn status_codes_match_storage_contract() {
        assert_eq!(ProductStatus::NotListed.code(), 0);
        assert_eq!(ProductStatus::Listed.code(), 2);
        assert_eq!(ProductStatus::from_code(2), Some(ProductStatus::Listed));
        assert_eq!(ProductStatus::from_code(1), None);
    }

    #[test]
    fn type_codes_match_storage_contract() {
        assert_eq!(ProductType::Normal.code(), 0);
        assert_eq!(ProductType::from_code(0), Some(ProductType::Normal));
        assert_eq!(ProductType::from_code(7), None);
    }
}
