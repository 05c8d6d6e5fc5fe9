//! Product catalog persistence and domain-entity layer.
//! This crate owns catalog write ordering and SKU reconciliation rules.

pub mod db;
pub mod entity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use entity::{ProductEntity, ProductState, SkuEntity};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{CategoryId, ProductCategory};
pub use model::form::{AttrInput, ProductForm, SkuInput};
pub use model::product::{
    MerchantId, Product, ProductFields, ProductId, ProductStatus, ProductType,
};
pub use model::sku::{
    AttrId, AttrValueId, ProductSku, ProductSkuAttrMap, SkuAttrBinding, SkuId, SkuUpdate,
};
pub use model::tag::{ProductTag, RProductTag, TagId};
pub use model::view::{ProductSkuView, ProductView};
pub use model::RecordStatus;
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::product_repo::{
    ProductRepository, RepoError, RepoResult, SkuSyncReport, SqliteProductRepository,
};
pub use service::product_service::{ProductDetail, ProductService, ProductServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
