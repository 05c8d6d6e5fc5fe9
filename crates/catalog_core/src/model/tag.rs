//! Tag label and product-tag link records.

use crate::model::product::{MerchantId, ProductId};
use serde::{Deserialize, Serialize};

pub type TagId = i64;

/// One `product_tags` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTag {
    pub id: TagId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Link between one product and one tag.
///
/// `product_id` stays `None` while the owning product is still a draft; the
/// repository stamps it before the link is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RProductTag {
    pub product_id: Option<ProductId>,
    pub tag_id: TagId,
    pub created_at: i64,
}
