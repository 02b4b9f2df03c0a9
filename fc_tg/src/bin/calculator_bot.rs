use fc_app::config_loader;
use fc_app::tracing_setup;
use fc_app::tracing_setup::LogOutput;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Config decides where logs go, so report its outcome once tracing is up
    let loaded = config_loader::load_bot_config(config_loader::DEFAULT_CONFIG_PATH);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let output = if config.log_to_stdout { LogOutput::FileAndStdout } else { LogOutput::FileOnly };
    let _guard = tracing_setup::init("calculator_bot", &config.log_dir, tracing::Level::INFO, output);

    match loaded {
        Ok(_) => tracing::info!("Loaded bot config from {}", config_loader::DEFAULT_CONFIG_PATH),
        Err(err) => tracing::warn!("Failed to load bot config from {}: {}. Using defaults.", config_loader::DEFAULT_CONFIG_PATH, err),
    }

    tracing::info!("🚀 Starting Trading Calculator Bot...");

    fc_tg::finish(fc_tg::run(config, config_loader::token_from_env()).await)?;
    Ok(())
}
