//! Knowledge-base layer: document catalog, disk access, and section assembly.

mod assemble;
pub mod catalog;
mod error;
pub mod knowledge;
pub mod search;

pub use assemble::{DomainSection, Reference};
pub use catalog::{Catalog, CatalogEntry, Format};
pub use error::StoreError;
pub use knowledge::KnowledgeBase;
pub use search::{SearchHit, search};
