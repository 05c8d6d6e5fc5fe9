//! Product category record.

use crate::model::product::MerchantId;
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// One `product_categories` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub merchant_id: MerchantId,
    /// `0` marks a top-level category.
    pub parent_id: CategoryId,
    pub name: String,
    pub sort: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
