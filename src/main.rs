use holdem_server::config::Config;
use holdem_server::ws::GameServer;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let addr = config.server_addr()?;
    let server = Arc::new(GameServer::new(&config));

    // 1 Hz clock driving turn timers and hand restarts on every table
    let ticker = Arc::clone(&server);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            ticker.tick_all().await;
        }
    });

    let app = holdem_server::create_app(server);
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
