//! Pending SKU with its attribute bindings.

use crate::entity::product_entity::ProductEntity;
use crate::model::form::{AttrInput, SkuInput};
use crate::model::now_epoch_ms;
use crate::model::product::{MerchantId, ProductId};
use crate::model::sku::{join_signature, SkuAttrBinding};
use crate::model::view::ProductSkuView;
use crate::model::RecordStatus;

/// SKU queued on a product entity, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuEntity {
    pub merchant_id: MerchantId,
    pub product_id: Option<ProductId>,
    pub price: i64,
    pub show_price: i64,
    pub cover: Option<String>,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: i64,
    attr_value_ids: String,
    attr_bindings: Vec<SkuAttrBinding>,
}

impl SkuEntity {
    /// Builds an unbound SKU owned by `owner`. Its signature starts empty.
    pub fn new(owner: &ProductEntity, input: &SkuInput) -> Self {
        let now = now_epoch_ms();
        Self {
            merchant_id: owner.fields.merchant_id,
            product_id: owner.id(),
            price: input.price,
            show_price: input.show_price,
            cover: input.cover.clone(),
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
            attr_value_ids: String::new(),
            attr_bindings: Vec::new(),
        }
    }

    /// Appends one binding per attribute and refreshes the signature.
    pub fn add_attr_maps(&mut self, attrs: &[AttrInput]) {
        let merchant_id = self.merchant_id;
        let product_id = self.product_id;
        self.attr_bindings.extend(attrs.iter().map(|attr| SkuAttrBinding {
            attr_id: attr.attr_id,
            attr_name: attr.attr_name.clone(),
            attr_value_id: attr.attr_value_id,
            attr_value_name: attr.attr_value_name.clone(),
            merchant_id,
            product_id,
            status: RecordStatus::Active,
            created_at: now_epoch_ms(),
            updated_at: 0,
        }));
        self.attr_value_ids = self.bind_attr_value_ids();
    }

    /// Recomputes the signature from the current bindings, in binding order.
    pub fn bind_attr_value_ids(&self) -> String {
        join_signature(
            self.attr_bindings
                .iter()
                .map(|binding| binding.attr_value_id),
        )
    }

    /// Signature written to `product_skus.attr_value_ids`.
    pub fn attr_value_ids(&self) -> &str {
        &self.attr_value_ids
    }

    pub fn attr_bindings(&self) -> &[SkuAttrBinding] {
        &self.attr_bindings
    }

    /// Not projected yet: returns the empty placeholder view.
    pub fn to_view(&self) -> ProductSkuView {
        ProductSkuView::default()
    }

    pub(crate) fn assign_product_id(&mut self, id: ProductId) {
        self.product_id = Some(id);
        for binding in &mut self.attr_bindings {
            binding.product_id = Some(id);
        }
    }
}
