//! Product aggregate builder.
//!
//! # Responsibility
//! - Accumulate pending tag links and SKUs before the repository commits
//!   them.
//! - Derive SKU signatures and read-side views.
//!
//! # Invariants
//! - Entities never write to storage; the repository owns every write.
//! - Read-through accessors receive the repository explicitly.

mod product_entity;
mod sku_entity;

pub use product_entity::{ProductEntity, ProductState};
pub use sku_entity::SkuEntity;
