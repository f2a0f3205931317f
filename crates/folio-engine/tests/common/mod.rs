#![allow(dead_code)]

use std::path::PathBuf;

use folio_core::content::{ArticleAdapter, ContentAdapter};
use folio_core::model::{Article, ContentEntity, EntityRef, Payload, PortfolioItem, Service};
use folio_store::db::{open_configured, DEFAULT_BUSY_TIMEOUT_MS};
use folio_store::ContentRepo;
use rusqlite::Connection;
use tempfile::TempDir;

pub fn setup_test_db() -> (TempDir, PathBuf, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("folio.db");
    let conn = open_configured(&path, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
    (temp_dir, path, conn)
}

pub fn seed_article(conn: &Connection, id: i64, title: &str) -> EntityRef {
    let article = Article {
        id,
        title: title.to_string(),
        slug: format!("article-{}", id),
        content: format!("{} body", title),
        tags: vec!["news".to_string()],
        ..Default::default()
    };
    ContentRepo::save(conn, &article.into()).unwrap();
    EntityRef::article(id).unwrap()
}

pub fn seed_portfolio_item(conn: &Connection, id: i64, title: &str) -> EntityRef {
    let item = PortfolioItem {
        id,
        title: title.to_string(),
        slug: format!("work-{}", id),
        technologies: vec!["rust".to_string()],
        ..Default::default()
    };
    ContentRepo::save(conn, &item.into()).unwrap();
    EntityRef::portfolio_item(id).unwrap()
}

pub fn seed_service(conn: &Connection, id: i64, title: &str) -> EntityRef {
    let service = Service {
        id,
        title: title.to_string(),
        slug: format!("service-{}", id),
        description: "What we do".to_string(),
        sort_order: 1,
        ..Default::default()
    };
    ContentRepo::save(conn, &service.into()).unwrap();
    EntityRef::service(id).unwrap()
}

/// Full article draft payload: every versioned field, with `overrides` on top
pub fn article_payload(overrides: serde_json::Value) -> Payload {
    let mut payload = ArticleAdapter
        .fields(&Article::default().into())
        .unwrap();
    for (field, value) in overrides.as_object().unwrap() {
        payload.insert(field.clone(), value.clone());
    }
    payload
}

/// Overwrite the live article title, as an editor saving the form would
pub fn edit_article_title(conn: &Connection, entity: EntityRef, title: &str) {
    let Some(ContentEntity::Article(mut article)) = ContentRepo::load(conn, entity).unwrap() else {
        panic!("article {} missing", entity);
    };
    article.title = title.to_string();
    ContentRepo::save(conn, &article.into()).unwrap();
}

pub fn live_title(conn: &Connection, entity: EntityRef) -> String {
    ContentRepo::load(conn, entity)
        .unwrap()
        .unwrap()
        .title()
        .to_string()
}

/// Count rows holding a flag, straight from the table
pub fn flag_holders(conn: &Connection, entity: EntityRef, column: &str) -> i64 {
    conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM content_versions WHERE entity_kind = ?1 AND entity_id = ?2 AND {} = 1",
            column
        ),
        rusqlite::params![entity.kind.tag(), entity.id],
        |row| row.get(0),
    )
    .unwrap()
}
