use serde_json::json;

use crate::errors::ContentError;
use crate::model::{ContentEntity, EntityKind, Payload};

use super::adapter::{ContentAdapter, FieldSpec, FieldType};
use super::fields::{read_integer, read_optional_text, read_text, read_text_list};

const SERVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("slug", FieldType::Text),
    FieldSpec::new("summary", FieldType::OptionalText),
    FieldSpec::new("description", FieldType::Text),
    FieldSpec::new("features", FieldType::TextList),
    FieldSpec::new("icon", FieldType::OptionalText),
    FieldSpec::new("sort_order", FieldType::Integer),
];

/// Adapter for service offerings.
///
/// Services are edited in place and versioned on save only; they have no
/// draft workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceAdapter;

impl ContentAdapter for ServiceAdapter {
    fn kind(&self) -> EntityKind {
        EntityKind::Service
    }

    fn field_specs(&self) -> &'static [FieldSpec] {
        SERVICE_FIELDS
    }

    fn supports_drafts(&self) -> bool {
        false
    }

    fn fields(&self, entity: &ContentEntity) -> Result<Payload, ContentError> {
        let ContentEntity::Service(service) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::Service,
                found: entity.kind(),
            });
        };

        let mut payload = Payload::new();
        payload.insert("title".into(), json!(service.title));
        payload.insert("slug".into(), json!(service.slug));
        payload.insert("summary".into(), json!(service.summary));
        payload.insert("description".into(), json!(service.description));
        payload.insert("features".into(), json!(service.features));
        payload.insert("icon".into(), json!(service.icon));
        payload.insert("sort_order".into(), json!(service.sort_order));
        Ok(payload)
    }

    fn apply(&self, entity: &mut ContentEntity, payload: &Payload) -> Result<(), ContentError> {
        let found = entity.kind();
        let ContentEntity::Service(service) = entity else {
            return Err(ContentError::KindMismatch {
                expected: EntityKind::Service,
                found,
            });
        };

        let mut next = service.clone();
        if let Some(v) = read_text(payload, "title")? {
            next.title = v;
        }
        if let Some(v) = read_text(payload, "slug")? {
            next.slug = v;
        }
        if let Some(v) = read_optional_text(payload, "summary")? {
            next.summary = v;
        }
        if let Some(v) = read_text(payload, "description")? {
            next.description = v;
        }
        if let Some(v) = read_text_list(payload, "features")? {
            next.features = v;
        }
        if let Some(v) = read_optional_text(payload, "icon")? {
            next.icon = v;
        }
        if let Some(v) = read_integer(payload, "sort_order")? {
            next.sort_order = v;
        }
        *service = next;
        Ok(())
    }
}
