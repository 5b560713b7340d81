use bpel_sweep::core::ConfigProvider;
use bpel_sweep::utils::error::ErrorSeverity;
use bpel_sweep::utils::{logger, validation::Validate};
use bpel_sweep::{CliConfig, LocalStorage, SweepEngine, SweepPipeline, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting bpel-sweep");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Some(path) = config.config.clone() {
        tracing::info!("Loading settings from {}", path);
        match TomlConfig::from_file(&path) {
            Ok(toml_config) => run(toml_config).await,
            Err(e) => {
                tracing::error!("Could not load {}: {}", path, e);
                eprintln!("{}", e.user_friendly_message());
                eprintln!("Suggestion: {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        }
    } else {
        run(config).await
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: C) {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.root_path().to_string());
    let pipeline = SweepPipeline::new(storage, config);
    let engine = SweepEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("Sweep completed: {}", summary);
            println!("{}", summary);
        }
        Err(e) => {
            tracing::error!(
                "Sweep failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

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
    }
}
