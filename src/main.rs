use skustore::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (development convenience)
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    skustore::start_server(config).await
}
