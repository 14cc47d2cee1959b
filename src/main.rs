use tracing_subscriber::EnvFilter;

use stockroom::api::server;
use stockroom::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    server::start_server(config).await;
}
