use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::LineCodec;
use crate::response::ServerResponse;
use crate::Error;

/// One client session over a line-framed TCP stream.
pub struct Connection {
    frames: Framed<TcpStream, LineCodec>,
    pub id: Uuid,
    pub client_address: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, client_address: SocketAddr) -> Connection {
        Connection {
            frames: Framed::new(stream, LineCodec),
            id: Uuid::new_v4(),
            client_address,
        }
    }

    /// Read the next message line. `None` means the peer closed the stream.
    pub async fn read_message(&mut self) -> Result<Option<String>, Error> {
        self.frames.next().await.transpose()
    }

    pub async fn write_response(&mut self, response: &ServerResponse) -> Result<(), Error> {
        self.frames.send(response.render()?).await
    }
}
