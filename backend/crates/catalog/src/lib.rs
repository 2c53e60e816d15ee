pub mod catalog;
pub mod client;
pub mod query;

pub use catalog::{EntityCatalog, GraphqlCatalog};
pub use client::{CatalogClient, CatalogError};
