//! Read-optimized projections handed to callers.

use crate::model::category::CategoryId;
use crate::model::product::{MerchantId, ProductFields, ProductId, ProductStatus, ProductType};
use crate::model::sku::SkuId;
use serde::Serialize;

/// Flat copy of every simple product field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    /// `None` for a product that was never saved.
    pub id: Option<ProductId>,
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

impl ProductView {
    pub fn from_fields(id: Option<ProductId>, fields: &ProductFields) -> Self {
        Self {
            id,
            category_id: fields.category_id,
            merchant_id: fields.merchant_id,
            name: fields.name.clone(),
            subtitle: fields.subtitle.clone(),
            cover: fields.cover.clone(),
            description: fields.description.clone(),
            status: fields.status,
            kind: fields.kind,
            sort: fields.sort,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
        }
    }
}

/// SKU projection placeholder.
///
/// SKU views are not projected yet; every field of the placeholder is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSkuView {
    pub id: Option<SkuId>,
    pub cover: Option<String>,
    pub price: Option<i64>,
    pub show_price: Option<i64>,
    pub attr_value_ids: Option<String>,
}
