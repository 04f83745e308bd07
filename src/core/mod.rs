pub mod generator;
pub mod media;
pub mod search;

pub use crate::domain::catalog::CatalogResponse;
pub use crate::domain::ports::{ConfigProvider, SearchQuery, ServiceDirectory};
pub use crate::utils::error::Result;
