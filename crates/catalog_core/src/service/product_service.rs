//! Product use-case service.
//!
//! # Responsibility
//! - Provide create/update/detail APIs over `ProductRepository`.
//! - Copy form fields into entities before persistence.
//!
//! # Invariants
//! - Tag sets are replaced on every create/update.
//! - SKUs are only replaced when the form carries a SKU list.
//! - Write operations read back through the repository before returning.

use crate::entity::ProductEntity;
use crate::model::category::ProductCategory;
use crate::model::form::{ProductForm, SkuInput};
use crate::model::product::ProductId;
use crate::model::sku::{ProductSku, SkuId, SkuUpdate};
use crate::model::tag::ProductTag;
use crate::model::view::ProductView;
use crate::repo::product_repo::{ProductRepository, RepoError, SkuSyncReport};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for product use-cases.
#[derive(Debug)]
pub enum ProductServiceError {
    ProductNotFound(ProductId),
    SkuNotFound(SkuId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl ProductServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "product_not_exist",
            Self::SkuNotFound(_) => "sku_not_exist",
            Self::Repo(err) => err.error_code(),
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for ProductServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::SkuNotFound(id) => write!(f, "sku not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent product state: {details}"),
        }
    }
}

impl Error for ProductServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProductServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProductNotFound(id) => Self::ProductNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Read-side projection of one product with its associations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: ProductView,
    pub category: Option<ProductCategory>,
    pub tags: Vec<ProductTag>,
    pub skus: Vec<ProductSku>,
}

/// Product service facade over repository implementations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates one product with its tags and, if present, its SKUs.
    pub fn create_product(&self, form: &ProductForm) -> Result<ProductDetail, ProductServiceError> {
        let mut entity = ProductEntity::from_form(form);
        entity.attach_tags(&form.tag_ids);
        let product_id = self.repo.save(&mut entity)?;

        if let Some(skus) = form.skus.as_deref() {
            entity.add_skus(skus);
            self.repo.save_skus(&entity)?;
        }

        info!("event=product_create module=service status=ok product_id={product_id}");
        self.read_back(product_id, "created product not found in read-back")
    }

    /// Overwrites form fields of a stored product and replaces its tag set.
    pub fn update_product(
        &self,
        product_id: ProductId,
        form: &ProductForm,
    ) -> Result<ProductDetail, ProductServiceError> {
        let mut entity = self.repo.by_id(product_id)?;
        form.apply_to(&mut entity.fields);
        entity.attach_tags(&form.tag_ids);
        self.repo.save(&mut entity)?;

        if let Some(skus) = form.skus.as_deref() {
            entity.add_skus(skus);
            self.repo.save_skus(&entity)?;
        }

        info!("event=product_update module=service status=ok product_id={product_id}");
        self.read_back(product_id, "updated product not found in read-back")
    }

    /// Replaces every SKU of a stored product.
    ///
    /// An empty input leaves the product without active SKUs.
    pub fn replace_skus(
        &self,
        product_id: ProductId,
        skus: &[SkuInput],
    ) -> Result<SkuSyncReport, ProductServiceError> {
        let mut entity = self.repo.by_id(product_id)?;
        entity.add_skus(skus);
        Ok(self.repo.save_skus(&entity)?)
    }

    /// Updates cover and prices of one SKU.
    pub fn update_sku(&self, update: &SkuUpdate) -> Result<ProductSku, ProductServiceError> {
        self.repo
            .update_one_sku(update)?
            .ok_or(ProductServiceError::SkuNotFound(update.sku_id))
    }

    pub fn product_detail(
        &self,
        product_id: ProductId,
    ) -> Result<ProductDetail, ProductServiceError> {
        let entity = self.repo.by_id(product_id)?;
        Ok(ProductDetail {
            product: entity.to_view(),
            category: entity.category(&self.repo)?,
            tags: entity.tags(&self.repo)?,
            skus: entity.product_skus(&self.repo)?,
        })
    }

    fn read_back(
        &self,
        product_id: ProductId,
        details: &'static str,
    ) -> Result<ProductDetail, ProductServiceError> {
        match self.product_detail(product_id) {
            Err(ProductServiceError::ProductNotFound(_)) => {
                Err(ProductServiceError::InconsistentState(details))
            }
            other => other,
        }
    }
}
