//! SQLite repository for live content rows

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, serialization, Result};
use chrono::Utc;
use folio_core::model::{Article, ContentEntity, EntityKind, EntityRef, PortfolioItem, Service};
use rusqlite::{Connection, OptionalExtension, Row};

/// SQLite repository for articles, portfolio items and services
pub struct ContentRepo;

impl ContentRepo {
    /// Load the live record behind an entity reference
    pub fn load(conn: &Connection, entity: EntityRef) -> Result<Option<ContentEntity>> {
        match entity.kind {
            EntityKind::Article => Self::load_article(conn, entity.id),
            EntityKind::PortfolioItem => Self::load_portfolio_item(conn, entity.id),
            EntityKind::Service => Self::load_service(conn, entity.id),
        }
    }

    /// Insert or update the live record
    ///
    /// Pass a `&Transaction` to make the write part of a larger unit.
    pub fn save(conn: &Connection, entity: &ContentEntity) -> Result<()> {
        let updated_at = Utc::now().timestamp_millis();
        match entity {
            ContentEntity::Article(article) => {
                conn.execute(
                    "INSERT INTO articles (id, title, slug, excerpt, content, featured_image, category, tags, meta_title, meta_description, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        slug = excluded.slug,
                        excerpt = excluded.excerpt,
                        content = excluded.content,
                        featured_image = excluded.featured_image,
                        category = excluded.category,
                        tags = excluded.tags,
                        meta_title = excluded.meta_title,
                        meta_description = excluded.meta_description,
                        updated_at = excluded.updated_at",
                    rusqlite::params![
                        article.id,
                        article.title,
                        article.slug,
                        article.excerpt,
                        article.content,
                        article.featured_image,
                        article.category,
                        encode_list("save_article", &article.tags)?,
                        article.meta_title,
                        article.meta_description,
                        updated_at,
                    ],
                )
                .map_err(from_rusqlite)?;
            }
            ContentEntity::PortfolioItem(item) => {
                conn.execute(
                    "INSERT INTO portfolio_items (id, title, slug, client, summary, content, technologies, gallery, project_url, is_featured, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        slug = excluded.slug,
                        client = excluded.client,
                        summary = excluded.summary,
                        content = excluded.content,
                        technologies = excluded.technologies,
                        gallery = excluded.gallery,
                        project_url = excluded.project_url,
                        is_featured = excluded.is_featured,
                        updated_at = excluded.updated_at",
                    rusqlite::params![
                        item.id,
                        item.title,
                        item.slug,
                        item.client,
                        item.summary,
                        item.content,
                        encode_list("save_portfolio_item", &item.technologies)?,
                        encode_list("save_portfolio_item", &item.gallery)?,
                        item.project_url,
                        if item.is_featured { 1 } else { 0 },
                        updated_at,
                    ],
                )
                .map_err(from_rusqlite)?;
            }
            ContentEntity::Service(service) => {
                conn.execute(
                    "INSERT INTO services (id, title, slug, summary, description, features, icon, sort_order, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        slug = excluded.slug,
                        summary = excluded.summary,
                        description = excluded.description,
                        features = excluded.features,
                        icon = excluded.icon,
                        sort_order = excluded.sort_order,
                        updated_at = excluded.updated_at",
                    rusqlite::params![
                        service.id,
                        service.title,
                        service.slug,
                        service.summary,
                        service.description,
                        encode_list("save_service", &service.features)?,
                        service.icon,
                        service.sort_order,
                        updated_at,
                    ],
                )
                .map_err(from_rusqlite)?;
            }
        }

        tracing::debug!(entity = %entity.entity_ref(), "Saved live content");

        Ok(())
    }

    fn load_article(conn: &Connection, id: i64) -> Result<Option<ContentEntity>> {
        let row = conn
            .query_row(
                "SELECT id, title, slug, excerpt, content, featured_image, category, tags, meta_title, meta_description
                 FROM articles WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        Article {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            slug: row.get(2)?,
                            excerpt: row.get(3)?,
                            content: row.get(4)?,
                            featured_image: row.get(5)?,
                            category: row.get(6)?,
                            tags: Vec::new(),
                            meta_title: row.get(8)?,
                            meta_description: row.get(9)?,
                        },
                        list_column(row, 7)?,
                    ))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.map(|(mut article, tags)| {
            article.tags = decode_list("load_article", &tags)?;
            Ok(ContentEntity::Article(article))
        })
        .transpose()
    }

    fn load_portfolio_item(conn: &Connection, id: i64) -> Result<Option<ContentEntity>> {
        let row = conn
            .query_row(
                "SELECT id, title, slug, client, summary, content, technologies, gallery, project_url, is_featured
                 FROM portfolio_items WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        PortfolioItem {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            slug: row.get(2)?,
                            client: row.get(3)?,
                            summary: row.get(4)?,
                            content: row.get(5)?,
                            technologies: Vec::new(),
                            gallery: Vec::new(),
                            project_url: row.get(8)?,
                            is_featured: row.get::<_, i64>(9)? != 0,
                        },
                        list_column(row, 6)?,
                        list_column(row, 7)?,
                    ))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.map(|(mut item, technologies, gallery)| {
            item.technologies = decode_list("load_portfolio_item", &technologies)?;
            item.gallery = decode_list("load_portfolio_item", &gallery)?;
            Ok(ContentEntity::PortfolioItem(item))
        })
        .transpose()
    }

    fn load_service(conn: &Connection, id: i64) -> Result<Option<ContentEntity>> {
        let row = conn
            .query_row(
                "SELECT id, title, slug, summary, description, features, icon, sort_order
                 FROM services WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        Service {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            slug: row.get(2)?,
                            summary: row.get(3)?,
                            description: row.get(4)?,
                            features: Vec::new(),
                            icon: row.get(6)?,
                            sort_order: row.get(7)?,
                        },
                        list_column(row, 5)?,
                    ))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.map(|(mut service, features)| {
            service.features = decode_list("load_service", &features)?;
            Ok(ContentEntity::Service(service))
        })
        .transpose()
    }
}

fn list_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    row.get(idx)
}

fn encode_list(op: &str, items: &[String]) -> Result<String> {
    serde_json::to_string(items).map_err(|e| serialization(op, e))
}

fn decode_list(op: &str, text: &str) -> Result<Vec<String>> {
    serde_json::from_str(text).map_err(|e| serialization(op, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_article_round_trip_keeps_tags() {
        let conn = setup();
        let article = ContentEntity::Article(Article {
            id: 1,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: "Body".to_string(),
            tags: vec!["rust".to_string(), "sqlite".to_string()],
            ..Default::default()
        });

        ContentRepo::save(&conn, &article).unwrap();
        let loaded = ContentRepo::load(&conn, EntityRef::article(1).unwrap()).unwrap();
        assert_eq!(loaded, Some(article));
    }

    #[test]
    fn test_save_updates_existing_row() {
        let conn = setup();
        let mut item = PortfolioItem {
            id: 2,
            title: "Shop".to_string(),
            slug: "shop".to_string(),
            ..Default::default()
        };
        ContentRepo::save(&conn, &item.clone().into()).unwrap();

        item.is_featured = true;
        item.gallery = vec!["a.png".to_string()];
        ContentRepo::save(&conn, &item.clone().into()).unwrap();

        let loaded = ContentRepo::load(&conn, EntityRef::portfolio_item(2).unwrap()).unwrap();
        assert_eq!(loaded, Some(ContentEntity::PortfolioItem(item)));
    }

    #[test]
    fn test_missing_service_is_none() {
        let conn = setup();
        let loaded = ContentRepo::load(&conn, EntityRef::service(99).unwrap()).unwrap();
        assert!(loaded.is_none());
    }
}
