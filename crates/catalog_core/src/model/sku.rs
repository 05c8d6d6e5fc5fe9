//! SKU rows and their attribute bindings.
//!
//! # Invariants
//! - `attr_value_ids` is the comma-joined list of bound attribute-value ids
//!   in binding order; it is the key used to find a freshly inserted SKU.
//! - A persisted `ProductSkuAttrMap` always names its SKU. Bindings that have
//!   not been matched to a SKU row only exist as `SkuAttrBinding`.

use crate::model::product::{MerchantId, ProductId};
use crate::model::RecordStatus;
use serde::{Deserialize, Serialize};

pub type SkuId = i64;
pub type SkuAttrMapId = i64;
pub type AttrId = i64;
pub type AttrValueId = i64;

/// Separator used when joining attribute-value ids into a signature.
pub const SIGNATURE_SEPARATOR: &str = ",";

/// One `product_skus` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSku {
    pub id: SkuId,
    pub merchant_id: MerchantId,
    pub product_id: ProductId,
    pub attr_value_ids: String,
    /// Minor currency units.
    pub price: i64,
    /// Minor currency units, the crossed-out display price.
    pub show_price: i64,
    pub cover: Option<String>,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attribute binding waiting for its SKU identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuAttrBinding {
    pub attr_id: AttrId,
    pub attr_name: String,
    pub attr_value_id: AttrValueId,
    pub attr_value_name: String,
    pub merchant_id: MerchantId,
    pub product_id: Option<ProductId>,
    pub status: RecordStatus,
    pub created_at: i64,
    /// `0` means the binding was never updated.
    pub updated_at: i64,
}

/// One `product_sku_attr_maps` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSkuAttrMap {
    pub id: SkuAttrMapId,
    pub sku_id: SkuId,
    pub merchant_id: MerchantId,
    pub product_id: ProductId,
    pub attr_id: AttrId,
    pub attr_name: String,
    pub attr_value_id: AttrValueId,
    pub attr_value_name: String,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial SKU update. Attribute bindings are absent: they only
/// change through a full SKU replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuUpdate {
    pub sku_id: SkuId,
    pub cover: Option<String>,
    pub price: i64,
    pub show_price: i64,
}

/// Joins attribute-value ids into a SKU signature, keeping input order.
pub fn join_signature<I>(attr_value_ids: I) -> String
where
    I: IntoIterator<Item = AttrValueId>,
{
    attr_value_ids
        .into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(SIGNATURE_SEPARATOR)
}
