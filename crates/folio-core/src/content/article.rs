use serde_json::json;

use crate::errors::ContentError;
use crate::model::{ContentEntity, EntityKind, Payload};

use super::adapter::{ContentAdapter, FieldSpec, FieldType};
use super::fields::{read_optional_text, read_text, read_text_list};

const ARTICLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("slug", FieldType::Text),
    FieldSpec::new("excerpt", FieldType::OptionalText),
    FieldSpec::new("content", FieldType::Text),
    FieldSpec::new("featured_image", FieldType::OptionalText),
    FieldSpec::new("category", FieldType::OptionalText),
    FieldSpec::new("tags", FieldType::TextList),
    FieldSpec::new("meta_title", FieldType::OptionalText),
    FieldSpec::new("meta_description", FieldType::OptionalText),
];

/// Adapter for blog posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleAdapter;

impl ContentAdapter for ArticleAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Article
    }

    fn field_specs(&self) -> &'static [FieldSpec] {
        ARTICLE_FIELDS
    }

    fn fields(&self, entity: &ContentEntity) -> Result<Payload, ContentError> {
        let ContentEntity::Article(article) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::Article,
                found: entity.kind(),
            });
        };

        let mut payload = Payload::new();
        payload.insert("title".into(), json!(article.title));
        payload.insert("slug".into(), json!(article.slug));
        payload.insert("excerpt".into(), json!(article.excerpt));
        payload.insert("content".into(), json!(article.content));
        payload.insert("featured_image".into(), json!(article.featured_image));
        payload.insert("category".into(), json!(article.category));
        payload.insert("tags".into(), json!(article.tags));
        payload.insert("meta_title".into(), json!(article.meta_title));
        payload.insert("meta_description".into(), json!(article.meta_description));
        Ok(payload)
    }

    fn apply(&self, entity: &mut ContentEntity, payload: &Payload) -> Result<(), ContentError> {
        let found = entity.kind();
        let ContentEntity::Article(article) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::Article,
                found,
            });
        };

        let mut next = article.clone();
        if let Some(v) = read_text(payload, "title")? {
            next.title = v;
        }
        if let Some(v) = read_text(payload, "slug")? {
            next.slug = v;
        }
        if let Some(v) = read_optional_text(payload, "excerpt")? {
            next.excerpt = v;
        }
        if let Some(v) = read_text(payload, "content")? {
            next.content = v;
        }
        if let Some(v) = read_optional_text(payload, "featured_image")? {
            next.featured_image = v;
        }
        if let Some(v) = read_optional_text(payload, "category")? {
            next.category = v;
        }
        if let Some(v) = read_text_list(payload, "tags")? {
            next.tags = v;
        }
        if let Some(v) = read_optional_text(payload, "meta_title")? {
            next.meta_title = v;
        }
        if let Some(v) = read_optional_text(payload, "meta_description")? {
            next.meta_description = v;
        }
        *article = next;
        Ok(())
    }
}
