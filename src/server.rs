use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

use crate::commands;
use crate::connection::Connection;
use crate::pool::AccountPool;
use crate::Error;

pub async fn run(port: u16, database_url: &str) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;

    let provider = AccountPool::connect(database_url).await?;
    provider.ensure_schema().await?;

    info!("Account server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let provider = provider.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_session(socket, client_address, provider).await {
                error!("session error: {}", e);
            }
        });
    }
}

#[instrument(
    name = "session",
    skip(stream, provider),
    fields(connection_id, client_address)
)]
async fn handle_session(
    stream: TcpStream,
    client_address: SocketAddr,
    provider: AccountPool,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream, client_address);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(message) = conn.read_message().await? {
        debug!("Received message: {:?}", message);

        let Some(response) = commands::dispatch(&message, &provider).await else {
            // "BYE" is the one message that gets no reply.
            info!("Client ended the session");
            break;
        };

        debug!("Sending response: {:?}", response);
        conn.write_response(&response).await?;
    }

    info!("Session closed");
    Ok(())
}
