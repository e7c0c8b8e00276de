use clap::Parser;
use myth_relay::utils::error::ErrorSeverity;
use myth_relay::utils::{logger, validation::Validate};
use myth_relay::{CliArgs, GeminiClient, QueryRelay, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Starting myth-relay CLI");

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match RelayConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => RelayConfig::from_env(),
    };

    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
        tracing::info!("🔧 Model overridden to: {}", model);
    }

    if args.verbose {
        tracing::debug!("Relay config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = GeminiClient::new(&config);
    let relay = QueryRelay::new(config, client);

    match relay.handle(&args.query).await {
        Ok(verdict) => {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&verdict)?
            } else {
                serde_json::to_string(&verdict)?
            };
            println!("{}", rendered);
            if verdict.is_fallback() {
                tracing::warn!("⚠️ Upstream output was unusable, printed a fallback verdict");
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Verification failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 2,
                ErrorSeverity::Medium | ErrorSeverity::High => 3,
                ErrorSeverity::Critical => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
