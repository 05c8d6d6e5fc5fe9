//! Tag and category repository.
//!
//! # Responsibility
//! - Create and list the labels and groupings products refer to.
//! - Own row mapping for `product_tags` and `product_categories`.
//!
//! # Invariants
//! - Missing categories resolve to `None`, never to an error.
//! - Tag names are stored trimmed; blank names are rejected.

use crate::model::category::{CategoryId, ProductCategory};
use crate::model::now_epoch_ms;
use crate::model::product::MerchantId;
use crate::model::tag::ProductTag;
use crate::repo::product_repo::{RepoError, RepoResult};
use crate::repo::support::{ensure_connection_ready, TableRequirement};
use log::info;
use rusqlite::{params, Connection, Row};

pub(crate) const TAG_SELECT_SQL: &str = "SELECT
    id,
    merchant_id,
    name,
    created_at,
    updated_at
FROM product_tags";

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    merchant_id,
    parent_id,
    name,
    sort,
    created_at,
    updated_at
FROM product_categories";

const REQUIRED_TABLES: &[TableRequirement] = &[
    (
        "product_tags",
        &["id", "merchant_id", "name", "created_at", "updated_at"],
    ),
    (
        "product_categories",
        &[
            "id",
            "merchant_id",
            "parent_id",
            "name",
            "sort",
            "created_at",
            "updated_at",
        ],
    ),
];

/// Repository interface for tags and categories.
pub trait CatalogRepository {
    fn create_category(
        &self,
        merchant_id: MerchantId,
        parent_id: CategoryId,
        name: &str,
    ) -> RepoResult<ProductCategory>;
    fn create_tag(&self, merchant_id: MerchantId, name: &str) -> RepoResult<ProductTag>;
    /// All tags sorted by name, then id.
    fn list_tags(&self) -> RepoResult<Vec<ProductTag>>;
}

/// SQLite-backed tag/category repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_category(
        &self,
        merchant_id: MerchantId,
        parent_id: CategoryId,
        name: &str,
    ) -> RepoResult<ProductCategory> {
        let name = required_name(name, "category")?;
        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO product_categories (merchant_id, parent_id, name, sort, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?4);",
            params![merchant_id, parent_id, name, now],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("event=category_create module=repo status=ok category_id={id}");

        load_category(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("category {id} missing right after insert"))
        })
    }

    fn create_tag(&self, merchant_id: MerchantId, name: &str) -> RepoResult<ProductTag> {
        let name = required_name(name, "tag")?;
        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO product_tags (merchant_id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![merchant_id, name, now],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("event=tag_create module=repo status=ok tag_id={id}");

        Ok(ProductTag {
            id,
            merchant_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn list_tags(&self) -> RepoResult<Vec<ProductTag>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }
}

pub(crate) fn load_category(
    conn: &Connection,
    category_id: CategoryId,
) -> RepoResult<Option<ProductCategory>> {
    let mut stmt = conn.prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([category_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_category_row(row)?));
    }
    Ok(None)
}

pub(crate) fn parse_tag_row(row: &Row<'_>) -> RepoResult<ProductTag> {
    Ok(ProductTag {
        id: row.get("id")?,
        merchant_id: row.get("merchant_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<ProductCategory> {
    Ok(ProductCategory {
        id: row.get("id")?,
        merchant_id: row.get("merchant_id")?,
        parent_id: row.get("parent_id")?,
        name: row.get("name")?,
        sort: row.get("sort")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn required_name<'a>(name: &'a str, what: &str) -> RepoResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidData(format!("{what} name cannot be blank")));
    }
    Ok(trimmed)
}
