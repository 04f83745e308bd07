use crate::config::{CliConfig, DEFAULT_BIND_ADDRESS};
use crate::core::generator::GeneratorOptions;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AdapterError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: GeneratorOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdapterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AdapterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TAN_BASE_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 命令列明確指定的值優先於檔案設定
    pub fn apply_overrides(&mut self, cli: &CliConfig) {
        if let Some(base_url) = &cli.upstream_base_url {
            tracing::info!("🔧 Upstream base URL overridden from command line");
            self.upstream.base_url = base_url.clone();
        }
        if let Some(bind) = &cli.bind {
            self.server.bind = bind.clone();
        }
        if cli.timeout_seconds.is_some() {
            self.upstream.timeout_seconds = cli.timeout_seconds;
        }
        if let Some(category_source) = cli.category_source {
            self.catalog.category_source = category_source;
        }
        if let Some(contact_placement) = cli.contact_placement {
            self.catalog.contact_placement = contact_placement;
        }
        if cli.catalog_categories {
            self.catalog.catalog_categories = true;
        }
        if let Some(media_base_url) = &cli.media_base_url {
            self.catalog.media_base_url = media_base_url.clone();
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn upstream_base_url(&self) -> &str {
        &self.upstream.base_url
    }

    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn generator_options(&self) -> GeneratorOptions {
        self.catalog.clone()
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.upstream.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("upstream.base_url", &self.upstream.base_url)?;
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_url("catalog.media_base_url", &self.catalog.media_base_url)?;
        if let Some(timeout) = self.upstream.timeout_seconds {
            validation::validate_range("upstream.timeout_seconds", timeout, 1, 300)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::{CategorySource, ContactPlacement};
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[upstream]
base_url = "https://tan.example.org/api"
timeout_seconds = 10

[server]
bind = "127.0.0.1:8080"

[catalog]
category_source = "disabilities"
contact_placement = "location"
catalog_categories = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.upstream_base_url(), "https://tan.example.org/api");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.request_timeout_seconds(), Some(10));
        let options = config.generator_options();
        assert_eq!(options.category_source, CategorySource::Disabilities);
        assert_eq!(options.contact_placement, ContactPlacement::Location);
        assert!(options.catalog_categories);
        assert_eq!(options.media_base_url, "https://image/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "https://tan.example.org"
"#,
        )
        .unwrap();

        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.generator_options(), GeneratorOptions::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TAN_ADAPTER_TEST_BASE_URL", "https://env.example.org");

        let config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "${TAN_ADAPTER_TEST_BASE_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.upstream.base_url, "https://env.example.org");

        std::env::remove_var("TAN_ADAPTER_TEST_BASE_URL");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "${TAN_ADAPTER_TEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "https://file.example.org"
"#,
        )
        .unwrap();
        let cli = CliConfig::parse_from([
            "tan-adapter",
            "--upstream-base-url",
            "https://cli.example.org",
            "--bind",
            "127.0.0.1:9000",
        ]);

        config.apply_overrides(&cli);

        assert_eq!(config.upstream_base_url(), "https://cli.example.org");
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_cli_catalog_flags_override_file() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "https://file.example.org"

[server]
bind = "127.0.0.1:8080"

[catalog]
media_base_url = "https://file.example.org/media/"
"#,
        )
        .unwrap();
        let cli = CliConfig::parse_from([
            "tan-adapter",
            "--bind",
            DEFAULT_BIND_ADDRESS,
            "--category-source",
            "disabilities",
            "--contact-placement",
            "location",
            "--media-base-url",
            "https://cdn.example.org/",
        ]);

        config.apply_overrides(&cli);

        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
        let options = config.generator_options();
        assert_eq!(options.category_source, CategorySource::Disabilities);
        assert_eq!(options.contact_placement, ContactPlacement::Location);
        assert_eq!(options.media_base_url, "https://cdn.example.org/");
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[upstream]
base_url = "https://file.example.org"

[server]
bind = "127.0.0.1:8080"

[catalog]
contact_placement = "location"
"#,
        )
        .unwrap();

        config.apply_overrides(&CliConfig::parse_from(["tan-adapter"]));

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(
            config.generator_options().contact_placement,
            ContactPlacement::Location
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[upstream]\nbase_url = \"https://tan.example.org\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.upstream.base_url, "https://tan.example.org");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[upstream\nbase_url = 1");
        assert!(matches!(
            result,
            Err(AdapterError::ConfigValidationError { .. })
        ));
    }
}
