//! Product entity: simple fields plus pending mutations.

use crate::entity::sku_entity::SkuEntity;
use crate::model::category::ProductCategory;
use crate::model::form::{ProductForm, SkuInput};
use crate::model::now_epoch_ms;
use crate::model::product::{Product, ProductFields, ProductId};
use crate::model::sku::ProductSku;
use crate::model::tag::{ProductTag, RProductTag, TagId};
use crate::model::view::{ProductSkuView, ProductView};
use crate::repo::product_repo::{ProductRepository, RepoResult};

/// Whether the product already has a storage identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductState {
    /// Built from input, never written.
    Draft,
    /// Backed by the `products` row with this id.
    Persisted(ProductId),
}

/// In-memory product aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntity {
    state: ProductState,
    pub fields: ProductFields,
    tag_inputs: Vec<RProductTag>,
    sku_inputs: Vec<SkuEntity>,
}

impl ProductEntity {
    /// Creates an unsaved product from caller-provided fields.
    pub fn draft(fields: ProductFields) -> Self {
        Self {
            state: ProductState::Draft,
            fields,
            tag_inputs: Vec::new(),
            sku_inputs: Vec::new(),
        }
    }

    /// Creates an unsaved product from a form, stamping both timestamps.
    ///
    /// Tags and SKUs in the form are not attached here.
    pub fn from_form(form: &ProductForm) -> Self {
        let now = now_epoch_ms();
        let mut fields = ProductFields {
            created_at: now,
            updated_at: now,
            ..ProductFields::default()
        };
        form.apply_to(&mut fields);
        Self::draft(fields)
    }

    /// Wraps a stored row. The result has no pending mutations.
    pub fn hydrate(product: Product) -> Self {
        Self {
            state: ProductState::Persisted(product.id),
            fields: product.fields,
            tag_inputs: Vec::new(),
            sku_inputs: Vec::new(),
        }
    }

    pub fn state(&self) -> ProductState {
        self.state
    }

    pub fn id(&self) -> Option<ProductId> {
        match self.state {
            ProductState::Draft => None,
            ProductState::Persisted(id) => Some(id),
        }
    }

    /// Queues one tag link per id, in input order.
    ///
    /// Duplicate ids produce duplicate links; an empty slice is a no-op.
    pub fn attach_tags(&mut self, tag_ids: &[TagId]) {
        if tag_ids.is_empty() {
            return;
        }

        let now = now_epoch_ms();
        let product_id = self.id();
        self.tag_inputs
            .extend(tag_ids.iter().map(|&tag_id| RProductTag {
                product_id,
                tag_id,
                created_at: now,
            }));
    }

    pub fn tag_inputs(&self) -> &[RProductTag] {
        &self.tag_inputs
    }

    /// Queues one SKU per input and binds its attributes immediately.
    pub fn add_skus(&mut self, inputs: &[SkuInput]) {
        let skus = inputs
            .iter()
            .map(|input| {
                let mut sku = SkuEntity::new(self, input);
                sku.add_attr_maps(&input.attrs);
                sku
            })
            .collect::<Vec<_>>();
        self.sku_inputs.extend(skus);
    }

    pub fn sku_inputs(&self) -> &[SkuEntity] {
        &self.sku_inputs
    }

    /// Tags currently linked in storage. Drafts have none.
    pub fn tags<R>(&self, repo: &R) -> RepoResult<Vec<ProductTag>>
    where
        R: ProductRepository + ?Sized,
    {
        match self.id() {
            Some(id) => repo.find_tags_by_product_id(id),
            None => Ok(Vec::new()),
        }
    }

    /// The referenced category, or `None` when its row is missing.
    pub fn category<R>(&self, repo: &R) -> RepoResult<Option<ProductCategory>>
    where
        R: ProductRepository + ?Sized,
    {
        repo.find_category_by_cate_id(self.fields.category_id)
    }

    /// Active SKUs currently stored for this product. Drafts have none.
    pub fn product_skus<R>(&self, repo: &R) -> RepoResult<Vec<ProductSku>>
    where
        R: ProductRepository + ?Sized,
    {
        match self.id() {
            Some(id) => repo.find_skus_by_id(id),
            None => Ok(Vec::new()),
        }
    }

    pub fn to_view(&self) -> ProductView {
        ProductView::from_fields(self.id(), &self.fields)
    }

    /// SKU views are not projected yet: always empty.
    // TODO: project stored SKUs with their attribute names once the storefront
    // SKU view shape is agreed on.
    pub fn product_sku_views(&self) -> Vec<ProductSkuView> {
        Vec::new()
    }

    /// Binds the storage identity and stamps it onto every pending record.
    pub(crate) fn assign_id(&mut self, id: ProductId) {
        self.state = ProductState::Persisted(id);
        for link in &mut self.tag_inputs {
            link.product_id = Some(id);
        }
        for sku in &mut self.sku_inputs {
            sku.assign_product_id(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProductEntity, ProductState};
    use crate::model::form::{AttrInput, ProductForm, SkuInput};
    use crate::model::product::{Product, ProductFields};

    fn persisted(id: i64) -> ProductEntity {
        ProductEntity::hydrate(Product {
            id,
            fields: ProductFields {
                merchant_id: 7,
                name: "Desk lamp".to_string(),
                ..ProductFields::default()
            },
        })
    }

    fn attr(attr_id: i64, value_id: i64) -> AttrInput {
        AttrInput {
            attr_id,
            attr_name: format!("attr-{attr_id}"),
            attr_value_id: value_id,
            attr_value_name: format!("value-{value_id}"),
        }
    }

    #[test]
    fn attach_tags_creates_one_link_per_id_with_product_id() {
        let mut entity = persisted(42);
        entity.attach_tags(&[5, 6, 5]);

        let links = entity.tag_inputs();
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|link| link.product_id == Some(42)));
        assert!(links.iter().all(|link| link.created_at >= 0));
        assert_eq!(
            links.iter().map(|link| link.tag_id).collect::<Vec<_>>(),
            vec![5, 6, 5]
        );
    }

    #[test]
    fn attach_tags_with_empty_input_is_noop() {
        let mut entity = persisted(42);
        entity.attach_tags(&[]);
        assert!(entity.tag_inputs().is_empty());
    }

    #[test]
    fn draft_links_wait_for_product_id() {
        let mut entity = ProductEntity::from_form(&ProductForm {
            name: "Mug".to_string(),
            ..ProductForm::default()
        });
        entity.attach_tags(&[1]);
        assert_eq!(entity.state(), ProductState::Draft);
        assert_eq!(entity.tag_inputs()[0].product_id, None);

        entity.assign_id(9);
        assert_eq!(entity.id(), Some(9));
        assert_eq!(entity.tag_inputs()[0].product_id, Some(9));
    }

    #[test]
    fn add_skus_inherits_owner_and_builds_signature() {
        let mut entity = persisted(42);
        entity.add_skus(&[SkuInput {
            cover: Some("red-s.png".to_string()),
            price: 1999,
            show_price: 2599,
            attrs: vec![attr(1, 12), attr(2, 7)],
        }]);

        let sku = &entity.sku_inputs()[0];
        assert_eq!(sku.product_id, Some(42));
        assert_eq!(sku.merchant_id, 7);
        assert_eq!(sku.price, 1999);
        assert_eq!(sku.show_price, 2599);
        assert_eq!(sku.cover.as_deref(), Some("red-s.png"));
        assert!(sku.status.is_active());
        assert_eq!(sku.attr_value_ids(), "12,7");
        assert_eq!(sku.attr_bindings().len(), 2);
    }

    #[test]
    fn to_view_copies_simple_fields() {
        let entity = persisted(3);
        let view = entity.to_view();
        assert_eq!(view.id, Some(3));
        assert_eq!(view.merchant_id, 7);
        assert_eq!(view.name, "Desk lamp");
        assert!(entity.product_sku_views().is_empty());
    }
}
