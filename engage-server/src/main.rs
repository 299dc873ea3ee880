use engage_server::realtime::Realtime;
use engage_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let level = if config.is_development() { "debug" } else { "info" };
    init_logger_with_file(Some(level), None);

    tracing::info!("Engage server starting...");

    let (socketio_layer, realtime) = Realtime::new();
    let state = ServerState::initialize(&config, realtime).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run(socketio_layer).await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
