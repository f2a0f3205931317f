use std::collections::HashMap;

use serde_json::Value;

use crate::errors::ContentError;
use crate::model::{ContentEntity, EntityKind, Payload};

use super::fields::json_type_name;
use super::{ArticleAdapter, PortfolioItemAdapter, ServiceAdapter};

/// JSON shape a versioned field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Required string
    Text,
    /// String or null
    OptionalText,
    /// Array of strings
    TextList,
    /// Boolean
    Flag,
    /// Integer
    Integer,
}

impl FieldType {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::OptionalText => "string or null",
            FieldType::TextList => "array of strings",
            FieldType::Flag => "boolean",
            FieldType::Integer => "integer",
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::OptionalText => value.is_string() || value.is_null(),
            FieldType::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldType::Flag => value.is_boolean(),
            FieldType::Integer => value.is_i64(),
        }
    }

    pub fn check(&self, field: &str, value: &Value) -> Result<(), ContentError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ContentError::FieldTypeMismatch {
                field: field.to_string(),
                expected: self.describe(),
                found: json_type_name(value).to_string(),
            })
        }
    }
}

/// A versioned field: its payload key and expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }
}

/// Maps one kind of live entity to and from snapshot payloads.
pub trait ContentAdapter: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Versioned fields in payload order
    fn field_specs(&self) -> &'static [FieldSpec];

    /// Whether the kind accepts parked drafts
    fn supports_drafts(&self) -> bool {
        true
    }

    /// Copy the versioned fields of a live entity into a fresh payload.
    ///
    /// # Errors
    ///
    /// `KindMismatch` if the entity belongs to another adapter.
    fn fields(&self, entity: &ContentEntity) -> Result<Payload, ContentError>;

    /// Write payload fields back onto a live entity.
    ///
    /// Only fields present in the payload are touched. Keys the kind no
    /// longer versions are skipped so that old snapshots stay restorable.
    /// On error the entity is left unchanged.
    ///
    /// # Errors
    ///
    /// `FieldTypeMismatch` for a value of the wrong shape, `KindMismatch`
    /// if the entity belongs to another adapter.
    fn apply(&self, entity: &mut ContentEntity, payload: &Payload) -> Result<(), ContentError>;

    fn versioned_fields(&self) -> Vec<&'static str> {
        self.field_specs().iter().map(|spec| spec.name).collect()
    }

    /// Strict check for caller-supplied payloads (drafts).
    ///
    /// A draft must carry every versioned field so that restoring it
    /// reproduces the same payload.
    ///
    /// # Errors
    ///
    /// `UnknownField` for keys outside [`field_specs`](Self::field_specs),
    /// `FieldTypeMismatch` for values of the wrong shape, `MissingField` for
    /// a versioned field the payload leaves out.
    fn validate_payload(&self, payload: &Payload) -> Result<(), ContentError> {
        for (name, value) in payload {
            let spec = self
                .field_specs()
                .iter()
                .find(|spec| spec.name == name)
                .ok_or_else(|| ContentError::UnknownField {
                    kind: self.kind(),
                    field: name.clone(),
                })?;
            spec.field_type.check(name, value)?;
        }
        if let Some(missing) = self
            .field_specs()
            .iter()
            .find(|spec| !payload.contains_key(spec.name))
        {
            return Err(ContentError::MissingField {
                kind: self.kind(),
                field: missing.name.to_string(),
            });
        }
        Ok(())
    }
}

/// Lookup from kind tag to adapter.
pub struct AdapterRegistry {
    adapters: HashMap<EntityKind, Box<dyn ContentAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with the article, portfolio item and service adapters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(ArticleAdapter)
            .register(PortfolioItemAdapter)
            .register(ServiceAdapter);
        registry
    }

    /// Register an adapter, replacing any previous one for the same kind
    pub fn register<A: ContentAdapter + 'static>(&mut self, adapter: A) -> &mut Self {
        self.adapters.insert(adapter.kind(), Box::new(adapter));
        self
    }

    /// # Errors
    ///
    /// `AdapterMissing` if nothing is registered for `kind`.
    pub fn get(&self, kind: EntityKind) -> Result<&dyn ContentAdapter, ContentError> {
        self.adapters
            .get(&kind)
            .map(|adapter| adapter.as_ref())
            .ok_or(ContentError::AdapterMissing { kind })
    }

    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = self.adapters.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
