pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::http::HttpServiceDirectory;
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::generator::{CatalogGenerator, CategorySource, ContactPlacement, GeneratorOptions};
pub use core::media::MediaUrlResolver;
pub use core::search::SearchOrchestrator;
pub use utils::error::{AdapterError, Result};
