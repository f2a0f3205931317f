use serde_json::json;

use crate::errors::ContentError;
use crate::model::{ContentEntity, EntityKind, Payload};

use super::adapter::{ContentAdapter, FieldSpec, FieldType};
use super::fields::{read_flag, read_optional_text, read_text, read_text_list};

const PORTFOLIO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("slug", FieldType::Text),
    FieldSpec::new("client", FieldType::OptionalText),
    FieldSpec::new("summary", FieldType::OptionalText),
    FieldSpec::new("content", FieldType::Text),
    FieldSpec::new("technologies", FieldType::TextList),
    FieldSpec::new("gallery", FieldType::TextList),
    FieldSpec::new("project_url", FieldType::OptionalText),
    FieldSpec::new("is_featured", FieldType::Flag),
];

/// Adapter for portfolio case studies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioItemAdapter;

impl ContentAdapter for PortfolioItemAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::PortfolioItem
    }

    fn field_specs(&self) -> &'static [FieldSpec] {
        PORTFOLIO_FIELDS
    }

    fn fields(&self, entity: &ContentEntity) -> Result<Payload, ContentError> {
        let ContentEntity::PortfolioItem(item) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::PortfolioItem,
                found: entity.kind(),
            });
        };

        let mut payload = Payload::new();
        payload.insert("title".into(), json!(item.title));
        payload.insert("slug".into(), json!(item.slug));
        payload.insert("client".into(), json!(item.client));
        payload.insert("summary".into(), json!(item.summary));
        payload.insert("content".into(), json!(item.content));
        payload.insert("technologies".into(), json!(item.technologies));
        payload.insert("gallery".into(), json!(item.gallery));
        payload.insert("project_url".into(), json!(item.project_url));
        payload.insert("is_featured".into(), json!(item.is_featured));
        Ok(payload)
    }

    fn apply(&self, entity: &mut ContentEntity, payload: &Payload) -> Result<(), ContentError> {
        let found = entity.kind();
        let ContentEntity::PortfolioItem(item) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::PortfolioItem,
                found,
            });
        };

        let mut next = item.clone();
        if let Some(v) = read_text(payload, "title")? {
            next.title = v;
        }
        if let Some(v) = read_text(payload, "slug")? {
            next.slug = v;
        }
        if let Some(v) = read_optional_text(payload, "client")? {
            next.client = v;
        }
        if let Some(v) = read_optional_text(payload, "summary")? {
            next.summary = v;
        }
        if let Some(v) = read_text(payload, "content")? {
            next.content = v;
        }
        if let Some(v) = read_text_list(payload, "technologies")? {
            next.technologies = v;
        }
        if let Some(v) = read_text_list(payload, "gallery")? {
            next.gallery = v;
        }
        if let Some(v) = read_optional_text(payload, "project_url")? {
            next.project_url = v;
        }
        if let Some(v) = read_flag(payload, "is_featured")? {
            next.is_featured = v;
        }
        *item = next;
        Ok(())
    }
}
