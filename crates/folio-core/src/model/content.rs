use serde::{Deserialize, Serialize};

use super::entity_ref::{EntityKind, EntityRef};

/// Blog post ("insight") as edited in the admin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Case study shown in the portfolio
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub client: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Media paths in display order
    #[serde(default)]
    pub gallery: Vec<String>,
    pub project_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Agency service offering
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

/// A live, editable content record of any versioned kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentEntity {
    #[serde(rename = "insight")]
    Article(Article),
    #[serde(rename = "portfolio")]
    PortfolioItem(PortfolioItem),
    Service(Service),
}

impl ContentEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            ContentEntity::Article(_) => EntityKind::Article,
            ContentEntity::PortfolioItem(_) => EntityKind::PortfolioItem,
            ContentEntity::Service(_) => EntityKind::Service,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ContentEntity::Article(a) => a.id,
            ContentEntity::PortfolioItem(p) => p.id,
            ContentEntity::Service(s) => s.id,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentEntity::Article(a) => &a.title,
            ContentEntity::PortfolioItem(p) => &p.title,
            ContentEntity::Service(s) => &s.title,
        }
    }
}

impl From<Article> for ContentEntity {
    fn from(value: Article) -> Self {
        ContentEntity::Article(value)
    }
}

impl From<PortfolioItem> for ContentEntity {
    fn from(value: PortfolioItem) -> Self {
        ContentEntity::PortfolioItem(value)
    }
}

impl From<Service> for ContentEntity {
    fn from(value: Service) -> Self {
        ContentEntity::Service(value)
    }
}
