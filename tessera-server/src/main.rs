use tessera_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, working directory, logging)
    let config = setup_environment()?;

    print_banner();

    tracing::info!("Tessera storefront server starting...");

    // 2. Server state (database, cart store)
    let state = ServerState::initialize(config.clone()).await?;

    // 3. HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
