use airline_routes::core::ConfigProvider;
use airline_routes::utils::error::ErrorSeverity;
use airline_routes::utils::{logger, validation::Validate};
use airline_routes::{CliConfig, EtlEngine, LocalStorage, RouteMapPipeline, TomlConfig};
use anyhow::Context;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting airline-routes");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let (verbose, monitor) = (cli.verbose, cli.monitor);
    match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            if verbose {
                tracing::debug!("File config: {:?}", config);
            }
            run(config, monitor).await
        }
        None => run(cli, monitor).await,
    }
}

async fn run<C: ConfigProvider + Validate>(config: C, monitor: bool) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if monitor {
        tracing::info!("🔍 Stage monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = RouteMapPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Route map completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Route map failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}
