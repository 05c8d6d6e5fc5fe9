//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist product aggregates in dependency order: product, tag links,
//!   SKUs, SKU attribute maps.
//! - Reconcile storage-assigned SKU ids back onto pending attribute bindings.
//!
//! # Invariants
//! - Tag links are replaced wholesale on every save.
//! - SKU replacement soft-deletes the previous SKUs; rows are never removed.
//! - Current-SKU queries always filter `is_deleted = 0`.
//! - Only the primary product lookup treats absence as an error.
//!
//! Transactions belong to the caller: pass a `rusqlite::Transaction` (it
//! derefs to `Connection`) to make one save atomic.

use crate::db::DbError;
use crate::entity::{ProductEntity, ProductState, SkuEntity};
use crate::model::category::{CategoryId, ProductCategory};
use crate::model::now_epoch_ms;
use crate::model::product::{Product, ProductFields, ProductId, ProductStatus, ProductType};
use crate::model::sku::{ProductSku, ProductSkuAttrMap, SkuAttrBinding, SkuId, SkuUpdate};
use crate::model::tag::{ProductTag, RProductTag, TagId};
use crate::repo::catalog_repo::{load_category, parse_tag_row, TAG_SELECT_SQL};
use crate::repo::support::{ensure_connection_ready, parse_status, status_to_db, TableRequirement};
use log::{debug, info, warn};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    category_id,
    merchant_id,
    name,
    subtitle,
    cover,
    description,
    status,
    type,
    sort,
    created_at,
    updated_at
FROM products";

const SKU_SELECT_SQL: &str = "SELECT
    id,
    merchant_id,
    product_id,
    attr_value_ids,
    price,
    show_price,
    cover,
    is_deleted,
    created_at,
    updated_at
FROM product_skus";

const ATTR_MAP_SELECT_SQL: &str = "SELECT
    id,
    sku_id,
    merchant_id,
    product_id,
    attr_id,
    attr_name,
    attr_value_id,
    attr_value_name,
    is_deleted,
    created_at,
    updated_at
FROM product_sku_attr_maps";

const REQUIRED_TABLES: &[TableRequirement] = &[
    (
        "products",
        &[
            "id",
            "category_id",
            "merchant_id",
            "name",
            "subtitle",
            "cover",
            "description",
            "status",
            "type",
            "sort",
            "created_at",
            "updated_at",
        ],
    ),
    ("r_product_tags", &["product_id", "tag_id", "created_at"]),
    (
        "product_skus",
        &[
            "id",
            "merchant_id",
            "product_id",
            "attr_value_ids",
            "price",
            "show_price",
            "cover",
            "is_deleted",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "product_sku_attr_maps",
        &[
            "id",
            "sku_id",
            "merchant_id",
            "product_id",
            "attr_id",
            "attr_name",
            "attr_value_id",
            "attr_value_name",
            "is_deleted",
            "created_at",
            "updated_at",
        ],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Primary product lookup found no row.
    ProductNotFound(ProductId),
    /// Operation needs a stored product but got a draft.
    ProductNotPersisted,
    /// Persisted data cannot be mapped to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable machine-readable code surfaced to callers and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::ProductNotFound(_) => "product_not_exist",
            Self::ProductNotPersisted => "product_not_persisted",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::ProductNotPersisted => write!(f, "product has not been saved yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome counters of one SKU replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkuSyncReport {
    /// Previously active SKUs that were soft-deleted.
    pub retired_skus: usize,
    pub inserted_skus: usize,
    /// Attribute maps written with a reconciled SKU id. Includes maps of
    /// collided SKUs, which land on the newest SKU sharing their signature.
    pub bound_attr_maps: usize,
    /// Bindings whose SKU signature was not found after insert. Only a
    /// storage-side rewrite of `attr_value_ids` (a trigger, say) gets here.
    pub dropped_attr_maps: usize,
    /// Pending SKUs whose signature repeats an earlier pending SKU. Their
    /// own rows are left without attribute maps.
    pub collided_skus: usize,
}

/// Storage access used by product entities and services.
pub trait ProductRepository {
    /// Inserts a draft or updates a stored product, then replaces its tag
    /// links. Returns the product id.
    fn save(&self, entity: &mut ProductEntity) -> RepoResult<ProductId>;
    /// Loads one product; a missing row is `RepoError::ProductNotFound`.
    fn by_id(&self, id: ProductId) -> RepoResult<ProductEntity>;
    /// Replaces all SKUs of a stored product with its pending SKUs.
    fn save_skus(&self, entity: &ProductEntity) -> RepoResult<SkuSyncReport>;
    fn find_tags_by_product_id(&self, product_id: ProductId) -> RepoResult<Vec<ProductTag>>;
    fn find_category_by_cate_id(
        &self,
        category_id: CategoryId,
    ) -> RepoResult<Option<ProductCategory>>;
    /// Active SKUs of one product, oldest first.
    fn find_skus_by_id(&self, product_id: ProductId) -> RepoResult<Vec<ProductSku>>;
    /// Active attribute maps of one SKU, in insertion order.
    fn find_attr_maps_by_sku_id(&self, sku_id: SkuId) -> RepoResult<Vec<ProductSkuAttrMap>>;
    /// Updates cover and prices of one active SKU. `None` when no such SKU.
    fn update_one_sku(&self, update: &SkuUpdate) -> RepoResult<Option<ProductSku>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn save(&self, entity: &mut ProductEntity) -> RepoResult<ProductId> {
        match entity.state() {
            ProductState::Persisted(id) => {
                entity.fields.updated_at = now_epoch_ms();
                update_product_row(self.conn, id, &entity.fields)?;
                entity.assign_id(id);

                let removed = self.conn.execute(
                    "DELETE FROM r_product_tags WHERE product_id = ?1;",
                    [id],
                )?;
                batch_insert_tag_links(self.conn, id, entity.tag_inputs())?;

                info!(
                    "event=product_save module=repo status=ok mode=update product_id={} tag_links_removed={} tag_links_inserted={}",
                    id,
                    removed,
                    entity.tag_inputs().len()
                );
                Ok(id)
            }
            ProductState::Draft => {
                let id = insert_product_row(self.conn, &entity.fields)?;
                entity.assign_id(id);
                batch_insert_tag_links(self.conn, id, entity.tag_inputs())?;

                info!(
                    "event=product_save module=repo status=ok mode=insert product_id={} tag_links_inserted={}",
                    id,
                    entity.tag_inputs().len()
                );
                Ok(id)
            }
        }
    }

    fn by_id(&self, id: ProductId) -> RepoResult<ProductEntity> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(ProductEntity::hydrate(parse_product_row(row)?)),
            None => {
                debug!(
                    "event=product_lookup module=repo status=error product_id={} error_code=product_not_exist",
                    id
                );
                Err(RepoError::ProductNotFound(id))
            }
        }
    }

    fn save_skus(&self, entity: &ProductEntity) -> RepoResult<SkuSyncReport> {
        let product_id = entity.id().ok_or(RepoError::ProductNotPersisted)?;
        let mut report = SkuSyncReport {
            retired_skus: self.conn.execute(
                "UPDATE product_skus
                 SET is_deleted = 1,
                     updated_at = ?2
                 WHERE product_id = ?1
                   AND is_deleted = 0;",
                params![product_id, now_epoch_ms()],
            )?,
            ..SkuSyncReport::default()
        };

        let pending = entity.sku_inputs();
        if pending.is_empty() {
            info!(
                "event=sku_sync module=repo status=ok product_id={} retired={} inserted=0",
                product_id, report.retired_skus
            );
            return Ok(report);
        }

        batch_insert_skus(self.conn, product_id, pending)?;
        report.inserted_skus = pending.len();

        // Later rows win when two active SKUs share a signature.
        let sku_id_by_signature: HashMap<String, SkuId> = self
            .find_skus_by_id(product_id)?
            .into_iter()
            .map(|sku| (sku.attr_value_ids, sku.id))
            .collect();

        let mut seen_signatures: HashSet<&str> = HashSet::new();
        let mut stamped: Vec<(SkuId, &SkuAttrBinding)> = Vec::new();
        for sku in pending {
            if !seen_signatures.insert(sku.attr_value_ids()) {
                report.collided_skus += 1;
            }
            match sku_id_by_signature.get(sku.attr_value_ids()) {
                Some(&sku_id) => stamped.extend(
                    sku.attr_bindings()
                        .iter()
                        .map(|binding| (sku_id, binding)),
                ),
                None => report.dropped_attr_maps += sku.attr_bindings().len(),
            }
        }

        batch_insert_attr_maps(self.conn, product_id, &stamped)?;
        report.bound_attr_maps = stamped.len();

        if report.collided_skus > 0 {
            warn!(
                "event=sku_sync module=repo status=degraded product_id={} collided_skus={} reason=duplicate_signature",
                product_id, report.collided_skus
            );
        }
        if report.dropped_attr_maps > 0 {
            warn!(
                "event=sku_sync module=repo status=degraded product_id={} dropped_attr_maps={} reason=signature_not_found",
                product_id, report.dropped_attr_maps
            );
        }
        info!(
            "event=sku_sync module=repo status=ok product_id={} retired={} inserted={} bound_attr_maps={}",
            product_id, report.retired_skus, report.inserted_skus, report.bound_attr_maps
        );
        Ok(report)
    }

    fn find_tags_by_product_id(&self, product_id: ProductId) -> RepoResult<Vec<ProductTag>> {
        let tag_ids = load_linked_tag_ids(self.conn, product_id)?;
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tag_ids.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL} WHERE id IN ({placeholders}) ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(tag_ids.iter()))?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn find_category_by_cate_id(
        &self,
        category_id: CategoryId,
    ) -> RepoResult<Option<ProductCategory>> {
        load_category(self.conn, category_id)
    }

    fn find_skus_by_id(&self, product_id: ProductId) -> RepoResult<Vec<ProductSku>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SKU_SELECT_SQL}
             WHERE product_id = ?1
               AND is_deleted = 0
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([product_id])?;
        let mut skus = Vec::new();
        while let Some(row) = rows.next()? {
            skus.push(parse_sku_row(row)?);
        }
        Ok(skus)
    }

    fn find_attr_maps_by_sku_id(&self, sku_id: SkuId) -> RepoResult<Vec<ProductSkuAttrMap>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTR_MAP_SELECT_SQL}
             WHERE sku_id = ?1
               AND is_deleted = 0
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([sku_id])?;
        let mut maps = Vec::new();
        while let Some(row) = rows.next()? {
            maps.push(parse_attr_map_row(row)?);
        }
        Ok(maps)
    }

    fn update_one_sku(&self, update: &SkuUpdate) -> RepoResult<Option<ProductSku>> {
        let Some(mut sku) = load_active_sku(self.conn, update.sku_id)? else {
            debug!(
                "event=sku_update module=repo status=skipped sku_id={} reason=not_found",
                update.sku_id
            );
            return Ok(None);
        };

        sku.cover = update.cover.clone();
        sku.price = update.price;
        sku.show_price = update.show_price;
        sku.updated_at = now_epoch_ms();

        self.conn.execute(
            "UPDATE product_skus
             SET cover = ?2,
                 price = ?3,
                 show_price = ?4,
                 updated_at = ?5
             WHERE id = ?1;",
            params![
                sku.id,
                sku.cover.as_deref(),
                sku.price,
                sku.show_price,
                sku.updated_at,
            ],
        )?;

        info!(
            "event=sku_update module=repo status=ok sku_id={} product_id={}",
            sku.id, sku.product_id
        );
        Ok(Some(sku))
    }
}

fn insert_product_row(conn: &Connection, fields: &ProductFields) -> RepoResult<ProductId> {
    conn.execute(
        "INSERT INTO products (
            category_id,
            merchant_id,
            name,
            subtitle,
            cover,
            description,
            status,
            type,
            sort,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
        params![
            fields.category_id,
            fields.merchant_id,
            fields.name.as_str(),
            fields.subtitle.as_deref(),
            fields.cover.as_deref(),
            fields.description.as_deref(),
            fields.status.code(),
            fields.kind.code(),
            fields.sort,
            fields.created_at,
            fields.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn update_product_row(conn: &Connection, id: ProductId, fields: &ProductFields) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE products
         SET
            category_id = ?2,
            merchant_id = ?3,
            name = ?4,
            subtitle = ?5,
            cover = ?6,
            description = ?7,
            status = ?8,
            type = ?9,
            sort = ?10,
            created_at = ?11,
            updated_at = ?12
         WHERE id = ?1;",
        params![
            id,
            fields.category_id,
            fields.merchant_id,
            fields.name.as_str(),
            fields.subtitle.as_deref(),
            fields.cover.as_deref(),
            fields.description.as_deref(),
            fields.status.code(),
            fields.kind.code(),
            fields.sort,
            fields.created_at,
            fields.updated_at,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::ProductNotFound(id));
    }
    Ok(())
}

fn batch_insert_tag_links(
    conn: &Connection,
    product_id: ProductId,
    links: &[RProductTag],
) -> RepoResult<()> {
    if links.is_empty() {
        return Ok(());
    }

    let mut stmt = conn.prepare(
        "INSERT INTO r_product_tags (product_id, tag_id, created_at)
         VALUES (?1, ?2, ?3);",
    )?;
    for link in links {
        stmt.execute(params![product_id, link.tag_id, link.created_at])?;
    }
    Ok(())
}

fn batch_insert_skus(conn: &Connection, product_id: ProductId, skus: &[SkuEntity]) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO product_skus (
            merchant_id,
            product_id,
            attr_value_ids,
            price,
            show_price,
            cover,
            is_deleted,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
    )?;
    for sku in skus {
        stmt.execute(params![
            sku.merchant_id,
            product_id,
            sku.attr_value_ids(),
            sku.price,
            sku.show_price,
            sku.cover.as_deref(),
            status_to_db(sku.status),
            sku.created_at,
            sku.updated_at,
        ])?;
    }
    Ok(())
}

fn batch_insert_attr_maps(
    conn: &Connection,
    product_id: ProductId,
    stamped: &[(SkuId, &SkuAttrBinding)],
) -> RepoResult<()> {
    if stamped.is_empty() {
        return Ok(());
    }

    let mut stmt = conn.prepare(
        "INSERT INTO product_sku_attr_maps (
            sku_id,
            merchant_id,
            product_id,
            attr_id,
            attr_name,
            attr_value_id,
            attr_value_name,
            is_deleted,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
    )?;
    for (sku_id, binding) in stamped {
        stmt.execute(params![
            sku_id,
            binding.merchant_id,
            product_id,
            binding.attr_id,
            binding.attr_name.as_str(),
            binding.attr_value_id,
            binding.attr_value_name.as_str(),
            status_to_db(binding.status),
            binding.created_at,
            binding.updated_at,
        ])?;
    }
    Ok(())
}

fn load_linked_tag_ids(conn: &Connection, product_id: ProductId) -> RepoResult<Vec<TagId>> {
    let mut stmt = conn.prepare(
        "SELECT tag_id
         FROM r_product_tags
         WHERE product_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([product_id])?;
    let mut tag_ids = Vec::new();
    while let Some(row) = rows.next()? {
        tag_ids.push(row.get(0)?);
    }
    Ok(tag_ids)
}

fn load_active_sku(conn: &Connection, sku_id: SkuId) -> RepoResult<Option<ProductSku>> {
    let mut stmt = conn.prepare(&format!(
        "{SKU_SELECT_SQL}
         WHERE id = ?1
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query([sku_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_sku_row(row)?));
    }
    Ok(None)
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let status_code: i64 = row.get("status")?;
    let status = ProductStatus::from_code(status_code).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_code}` in products.status"))
    })?;

    let type_code: i64 = row.get("type")?;
    let kind = ProductType::from_code(type_code).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid type `{type_code}` in products.type"))
    })?;

    Ok(Product {
        id: row.get("id")?,
        fields: ProductFields {
            category_id: row.get("category_id")?,
            merchant_id: row.get("merchant_id")?,
            name: row.get("name")?,
            subtitle: row.get("subtitle")?,
            cover: row.get("cover")?,
            description: row.get("description")?,
            status,
            kind,
            sort: row.get("sort")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
    })
}

fn parse_sku_row(row: &Row<'_>) -> RepoResult<ProductSku> {
    Ok(ProductSku {
        id: row.get("id")?,
        merchant_id: row.get("merchant_id")?,
        product_id: row.get("product_id")?,
        attr_value_ids: row.get("attr_value_ids")?,
        price: row.get("price")?,
        show_price: row.get("show_price")?,
        cover: row.get("cover")?,
        status: parse_status(row.get("is_deleted")?, "product_skus.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_attr_map_row(row: &Row<'_>) -> RepoResult<ProductSkuAttrMap> {
    Ok(ProductSkuAttrMap {
        id: row.get("id")?,
        sku_id: row.get("sku_id")?,
        merchant_id: row.get("merchant_id")?,
        product_id: row.get("product_id")?,
        attr_id: row.get("attr_id")?,
        attr_name: row.get("attr_name")?,
        attr_value_id: row.get("attr_value_id")?,
        attr_value_name: row.get("attr_value_name")?,
        status: parse_status(row.get("is_deleted")?, "product_sku_attr_maps.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::RepoError;

    #[test]
    fn not_found_carries_stable_error_code() {
        let err = RepoError::ProductNotFound(12);
        assert_eq!(err.error_code(), "product_not_exist");
        assert_eq!(err.to_string(), "product not found: 12");
    }
}
