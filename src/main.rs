use biobase::{app, config, is_production};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config().clone();
    app::init_tracing(config.api.enable_request_logging);

    tracing::info!("Starting Biobase in {:?} mode", config.environment);
    if is_production!() && !config.security.secure_cookies {
        tracing::warn!("Session cookies are not marked Secure in production");
    }

    app::serve(config).await
}
