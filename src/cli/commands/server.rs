use crate::cli::{utils::Report, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn serve(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }
    crate::app::serve(config).await
}

pub async fn migrate(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    DatabaseManager::connect_and_migrate(&config.database).await?;

    Report::new("Database is up to date")
        .detail("database", config.database.url.as_str())
        .print(&output_format)
}
