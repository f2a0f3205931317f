use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ContentError;

/// The kinds of structured content that carry a version history.
///
/// The serialized tag is what the snapshot table stores in `entity_kind`;
/// articles keep the admin's historical `insight` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "insight", alias = "article", alias = "post")]
    Article,
    #[serde(rename = "portfolio", alias = "portfolio_item")]
    PortfolioItem,
    #[serde(rename = "service")]
    Service,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Article,
        EntityKind::PortfolioItem,
        EntityKind::Service,
    ];

    /// Persisted tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Article => "insight",
            EntityKind::PortfolioItem => "portfolio",
            EntityKind::Service => "service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EntityKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insight" | "article" | "post" => Ok(EntityKind::Article),
            "portfolio" | "portfolio_item" => Ok(EntityKind::PortfolioItem),
            "service" => Ok(EntityKind::Service),
            _ => Err(ContentError::UnknownKind { tag: s.to_string() }),
        }
    }
}

/// Polymorphic reference to a versioned content entity: a kind tag plus the
/// live record's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl EntityRef {
    /// Build a reference, rejecting non-positive ids
    pub fn new(kind: EntityKind, id: i64) -> Result<Self, ContentError> {
        if id <= 0 {
            return Err(ContentError::InvalidEntityId { id });
        }
        Ok(Self { kind, id })
    }

    pub fn article(id: i64) -> Result<Self, ContentError> {
        Self::new(EntityKind::Article, id)
    }

    pub fn portfolio_item(id: i64) -> Result<Self, ContentError> {
        Self::new(EntityKind::PortfolioItem, id)
    }

    pub fn service(id: i64) -> Result<Self, ContentError> {
        Self::new(EntityKind::Service, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Parses `kind:id`, e.g. `insight:12` or `service:3`.
impl FromStr for EntityRef {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ContentError::InvalidEntityRef {
            input: s.to_string(),
        };
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let kind: EntityKind = kind.parse()?;
        let id: i64 = id.trim().parse().map_err(|_| invalid())?;
        EntityRef::new(kind, id)
    }
}
