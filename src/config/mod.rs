pub mod toml_config;

use crate::core::generator::{CategorySource, ContactPlacement, GeneratorOptions};
use crate::core::media::DEFAULT_MEDIA_BASE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tan-adapter")]
#[command(about = "Search adapter serving the TAN disability-services directory as a catalog")]
pub struct CliConfig {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, env = "TAN_BASE_URL")]
    pub upstream_base_url: Option<String>,

    // Flags left unset stay `None` so a config file value is only replaced
    // when the flag was actually given.
    #[arg(long, help = "Listen address [default: 0.0.0.0:3000]")]
    pub bind: Option<String>,

    #[arg(long, value_enum, help = "Field read first for category labels [default: categories]")]
    pub category_source: Option<CategorySource>,

    #[arg(long, value_enum, help = "Where address contacts are emitted [default: provider]")]
    pub contact_placement: Option<ContactPlacement>,

    #[arg(long, help = "Emit deduplicated categories at catalog level")]
    pub catalog_categories: bool,

    #[arg(long, help = "Base URL for relative image paths [default: https://image/]")]
    pub media_base_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn upstream_base_url(&self) -> &str {
        self.upstream_base_url.as_deref().unwrap_or_default()
    }

    fn bind_address(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            category_source: self.category_source.unwrap_or_default(),
            contact_placement: self.contact_placement.unwrap_or_default(),
            catalog_categories: self.catalog_categories,
            media_base_url: self
                .media_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_BASE.to_string()),
        }
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let base_url =
            validation::validate_required_field("upstream_base_url", &self.upstream_base_url)?;
        validation::validate_url("upstream_base_url", base_url)?;
        validation::validate_socket_addr("bind", self.bind_address())?;
        if let Some(media_base_url) = &self.media_base_url {
            validation::validate_url("media_base_url", media_base_url)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 300)?;
        }
        Ok(())
    }
}
