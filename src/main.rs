use clap::Parser;
use std::sync::Arc;
use tan_adapter::domain::ports::ConfigProvider;
use tan_adapter::utils::error::ErrorSeverity;
use tan_adapter::utils::{logger, validation::Validate};
use tan_adapter::{
    server, AdapterError, CatalogGenerator, CliConfig, HttpServiceDirectory, SearchOrchestrator,
    TomlConfig,
};

async fn serve<C: ConfigProvider + Validate>(config: C) -> Result<(), AdapterError> {
    config.validate()?;

    let options = config.generator_options();
    tracing::debug!("Generator options: {:?}", options);

    let directory = HttpServiceDirectory::from_config(&config)?;
    tracing::info!("🔗 Upstream directory: {}", directory.base_url());

    let orchestrator = Arc::new(SearchOrchestrator::new(
        directory,
        CatalogGenerator::new(options),
    ));
    let app = server::app_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🚀 Listening on {}", config.bind_address());
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting tan-adapter");

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    config.apply_overrides(&cli);
                    serve(config).await
                }
                Err(e) => Err(e),
            }
        }
        None => serve(cli.clone()).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ tan-adapter failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
