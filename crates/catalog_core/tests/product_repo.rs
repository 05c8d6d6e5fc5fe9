use catalog_core::db::migrations::latest_version;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    CatalogRepository, ProductEntity, ProductFields, ProductForm, ProductRepository,
    ProductState, ProductStatus, RepoError, SqliteCatalogRepository, SqliteProductRepository,
};
use rusqlite::Connection;

fn form(name: &str) -> ProductForm {
    ProductForm {
        category_id: 0,
        merchant_id: 7,
        name: name.to_string(),
        subtitle: Some("subtitle".to_string()),
        cover: Some("cover.png".to_string()),
        description: Some("long description".to_string()),
        status: ProductStatus::Listed,
        sort: 3,
        ..ProductForm::default()
    }
}

fn link_count(conn: &Connection, product_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM r_product_tags WHERE product_id = ?1;",
        [product_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn save_draft_then_by_id_roundtrips_simple_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut entity = ProductEntity::from_form(&form("Desk lamp"));
    let id = repo.save(&mut entity).unwrap();
    assert_eq!(entity.state(), ProductState::Persisted(id));

    let loaded = repo.by_id(id).unwrap();
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.fields, entity.fields);
    assert!(loaded.tag_inputs().is_empty());
    assert!(loaded.sku_inputs().is_empty());
}

#[test]
fn by_id_with_unknown_id_is_product_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let err = repo.by_id(404).unwrap_err();
    assert!(matches!(err, RepoError::ProductNotFound(404)));
    assert_eq!(err.error_code(), "product_not_exist");
}

#[test]
fn hydrated_entity_accessors_resolve_empty_without_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut draft = ProductEntity::from_form(&ProductForm {
        category_id: 999,
        ..form("Orphan")
    });
    let id = repo.save(&mut draft).unwrap();

    let entity = repo.by_id(id).unwrap();
    assert!(entity.tags(&repo).unwrap().is_empty());
    assert!(entity.category(&repo).unwrap().is_none());
    assert!(entity.product_skus(&repo).unwrap().is_empty());
}

#[test]
fn draft_accessors_do_not_need_storage_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let draft = ProductEntity::draft(ProductFields::default());
    assert!(draft.tags(&repo).unwrap().is_empty());
    assert!(draft.product_skus(&repo).unwrap().is_empty());
}

#[test]
fn draft_save_stamps_generated_id_on_tag_links() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let tag = catalog.create_tag(7, "new").unwrap();

    let mut entity = ProductEntity::from_form(&form("Kettle"));
    entity.attach_tags(&[tag.id]);
    assert_eq!(entity.tag_inputs()[0].product_id, None);

    let id = repo.save(&mut entity).unwrap();
    assert_eq!(entity.tag_inputs()[0].product_id, Some(id));
    assert_eq!(link_count(&conn, id), 1);

    let tags = repo.find_tags_by_product_id(id).unwrap();
    assert_eq!(tags, vec![tag]);
}

#[test]
fn save_on_persisted_entity_replaces_tag_links() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let summer = catalog.create_tag(7, "summer").unwrap();
    let sale = catalog.create_tag(7, "sale").unwrap();
    let outdoor = catalog.create_tag(7, "outdoor").unwrap();

    let mut entity = ProductEntity::from_form(&form("Tent"));
    entity.attach_tags(&[summer.id, sale.id]);
    let id = repo.save(&mut entity).unwrap();

    let mut reloaded = repo.by_id(id).unwrap();
    reloaded.fields.name = "Tent XL".to_string();
    reloaded.attach_tags(&[outdoor.id]);
    repo.save(&mut reloaded).unwrap();

    let tags = repo.find_tags_by_product_id(id).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, outdoor.id);
    assert_eq!(repo.by_id(id).unwrap().fields.name, "Tent XL");
}

#[test]
fn save_without_pending_tags_clears_links() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let tag = catalog.create_tag(7, "gone").unwrap();

    let mut entity = ProductEntity::from_form(&form("Chair"));
    entity.attach_tags(&[tag.id]);
    let id = repo.save(&mut entity).unwrap();

    let mut reloaded = repo.by_id(id).unwrap();
    repo.save(&mut reloaded).unwrap();

    assert_eq!(link_count(&conn, id), 0);
    assert!(reloaded.tags(&repo).unwrap().is_empty());
}

#[test]
fn duplicate_tag_ids_are_stored_as_duplicate_links() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let tag = catalog.create_tag(7, "twice").unwrap();

    let mut entity = ProductEntity::from_form(&form("Table"));
    entity.attach_tags(&[tag.id, tag.id]);
    let id = repo.save(&mut entity).unwrap();

    assert_eq!(link_count(&conn, id), 2);
    assert_eq!(repo.find_tags_by_product_id(id).unwrap().len(), 1);
}

#[test]
fn save_updates_timestamp_on_persisted_product() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut entity = ProductEntity::from_form(&form("Clock"));
    entity.fields.updated_at = 1;
    let id = repo.save(&mut entity).unwrap();

    let mut reloaded = repo.by_id(id).unwrap();
    assert_eq!(reloaded.fields.updated_at, 1);
    repo.save(&mut reloaded).unwrap();
    assert!(repo.by_id(id).unwrap().fields.updated_at > 1);
}

#[test]
fn category_lookup_returns_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let category = catalog.create_category(7, 0, "Lighting").unwrap();

    let mut entity = ProductEntity::from_form(&ProductForm {
        category_id: category.id,
        ..form("Floor lamp")
    });
    repo.save(&mut entity).unwrap();

    assert_eq!(entity.category(&repo).unwrap(), Some(category));
}

#[test]
fn catalog_repo_lists_tags_by_name_and_rejects_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    catalog.create_tag(1, "Winter").unwrap();
    catalog.create_tag(1, " autumn ").unwrap();

    let names = catalog
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["autumn".to_string(), "Winter".to_string()]);

    assert!(matches!(
        catalog.create_tag(1, "   "),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteProductRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_sku_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY, category_id INTEGER, merchant_id INTEGER, name TEXT,
            subtitle TEXT, cover TEXT, description TEXT, status INTEGER, type INTEGER,
            sort INTEGER, created_at INTEGER, updated_at INTEGER
        );
        CREATE TABLE r_product_tags (product_id INTEGER, tag_id INTEGER, created_at INTEGER);
        CREATE TABLE product_skus (id INTEGER PRIMARY KEY, product_id INTEGER);",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "product_skus",
            column: "merchant_id"
        })
    ));
}
