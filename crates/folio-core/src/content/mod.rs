//! Content adapters.
//!
//! The only kind-specific code in the versioning stack. Each adapter knows
//! which fields of its live entity are versioned and how to copy them into
//! and out of a [`Payload`](crate::model::Payload); everything downstream
//! treats payloads as opaque ordered maps.

pub mod adapter;
pub mod article;
mod fields;
pub mod portfolio;
pub mod service;

pub use adapter::{AdapterRegistry, ContentAdapter, FieldSpec, FieldType};
pub use article::ArticleAdapter;
pub use portfolio::PortfolioItemAdapter;
pub use service::ServiceAdapter;
