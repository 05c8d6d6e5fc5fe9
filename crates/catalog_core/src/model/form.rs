//! Inbound request forms.
//!
//! Forms are copied into domain records field by field: fields with a
//! counterpart are copied, anything else is ignored.

use crate::model::category::CategoryId;
use crate::model::product::{MerchantId, ProductFields, ProductStatus};
use crate::model::sku::{AttrId, AttrValueId};
use crate::model::tag::TagId;
use serde::{Deserialize, Serialize};

/// Back-office create/update form for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub category_id: CategoryId,
    pub merchant_id: MerchantId,
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub sort: i64,
    /// Replaces the full tag set on save.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    /// `None` leaves existing SKUs untouched on update.
    #[serde(default)]
    pub skus: Option<Vec<SkuInput>>,
}

impl ProductForm {
    /// Copies the form's matching fields onto `fields`.
    ///
    /// Identity, product type and timestamps are not form-controlled and stay
    /// as they are.
    pub fn apply_to(&self, fields: &mut ProductFields) {
        fields.category_id = self.category_id;
        fields.merchant_id = self.merchant_id;
        fields.name = self.name.clone();
        fields.subtitle = self.subtitle.clone();
        fields.cover = self.cover.clone();
        fields.description = self.description.clone();
        fields.status = self.status;
        fields.sort = self.sort;
    }
}

/// One purchasable variant in a product form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuInput {
    #[serde(default)]
    pub cover: Option<String>,
    pub price: i64,
    pub show_price: i64,
    /// Binding order defines the SKU signature.
    #[serde(default)]
    pub attrs: Vec<AttrInput>,
}

/// One selected attribute value of a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrInput {
    pub attr_id: AttrId,
    pub attr_name: String,
    pub attr_value_id: AttrValueId,
    pub attr_value_name: String,
}

#[cfg(test)]
mod tests {
    use super::ProductForm;
    use crate::model::product::{ProductFields, ProductStatus, ProductType};

    #[test]
    fn apply_to_keeps_identity_and_timestamps() {
        let mut fields = ProductFields {
            kind: ProductType::Normal,
            created_at: 11,
            updated_at: 22,
            ..ProductFields::default()
        };
        let form = ProductForm {
            category_id: 3,
            merchant_id: 9,
            name: "Linen shirt".to_string(),
            status: ProductStatus::Listed,
            sort: 5,
            ..ProductForm::default()
        };

        form.apply_to(&mut fields);

        assert_eq!(fields.category_id, 3);
        assert_eq!(fields.merchant_id, 9);
        assert_eq!(fields.name, "Linen shirt");
        assert_eq!(fields.status, ProductStatus::Listed);
        assert_eq!(fields.sort, 5);
        assert_eq!(fields.created_at, 11);
        assert_eq!(fields.updated_at, 22);
    }
}
