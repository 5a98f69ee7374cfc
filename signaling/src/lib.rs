use anyhow::anyhow;
use actix_codec::Framed;
pub use awc::ws;
use awc::{ws::Codec, BoxedSocket, ClientResponse};
use futures_util::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::message::{ClientEvent, ClientRequest, RobotEvent, RobotId, RobotRequest};

pub mod message;

/// A websocket connection to one of the broker's endpoints, framing
/// JSON text messages. Transport pings are answered inline while
/// waiting for the next message.
pub struct Connection {
    ws: Framed<BoxedSocket, Codec>,
}

impl Connection {
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let (_res, ws) = Self::connect_raw(address).await?;
        Ok(Self { ws })
    }

    pub async fn connect_raw(
        address: &str,
    ) -> Result<(ClientResponse, Framed<BoxedSocket, Codec>), anyhow::Error> {
        awc::Client::new()
            .ws(address)
            .connect()
            .await
            .map_err(|e| anyhow!("Failed to connect to {address}: {e}"))
    }

    pub async fn send_json<T: Serialize>(&mut self, msg: &T) -> anyhow::Result<()> {
        self.ws
            .send(ws::Message::Text(serde_json::to_string(msg)?.into()))
            .await?;
        Ok(())
    }

    /// Sends a raw text frame without going through the typed protocol.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws
            .send(ws::Message::Text(text.to_string().into()))
            .await?;
        Ok(())
    }

    pub async fn next_json<T: DeserializeOwned>(&mut self) -> anyhow::Result<T> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                ws::Frame::Text(text) => return Ok(serde_json::from_slice(&text)?),
                ws::Frame::Ping(msg) => self.ws.send(ws::Message::Pong(msg)).await?,
                ws::Frame::Pong(_) => {}
                ws::Frame::Close(reason) => return Err(anyhow!("Connection closed: {reason:?}")),
                other => debug!(?other, "Ignoring non-text frame"),
            }
        }
        Err(anyhow!("Connection dropped"))
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close().await?;
        Ok(())
    }
}

/// Typed connection to the broker's robot endpoint.
pub struct RobotLink {
    conn: Connection,
}

impl RobotLink {
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        Ok(Self {
            conn: Connection::connect(address).await?,
        })
    }

    /// Performs the register/registered exchange and returns the
    /// assigned id. The reply is the only way a robot learns its id.
    pub async fn register(&mut self, name: &str, sdp_offer: Option<Value>) -> anyhow::Result<RobotId> {
        self.send(&RobotRequest::Register {
            name: name.to_string(),
            sdp_offer,
        })
        .await?;
        match self.recv().await? {
            RobotEvent::Registered { robot_id } => Ok(robot_id),
            other => Err(anyhow!("Expected registered reply, got {other:?}")),
        }
    }

    pub async fn send(&mut self, request: &RobotRequest) -> anyhow::Result<()> {
        self.conn.send_json(request).await
    }

    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.conn.send_raw(text).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<RobotEvent> {
        self.conn.next_json().await
    }

    pub async fn close(self) -> anyhow::Result<()> {
        self.conn.close().await
    }
}

/// Typed connection to the broker's client endpoint.
pub struct ClientLink {
    conn: Connection,
}

impl ClientLink {
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        Ok(Self {
            conn: Connection::connect(address).await?,
        })
    }

    /// Requests the current robot list and returns the direct reply.
    /// Routed events arriving first are returned by later `recv` calls,
    /// so callers should drain pending events before querying.
    pub async fn robots(&mut self) -> anyhow::Result<Vec<message::Robot>> {
        self.send(&ClientRequest::GetRobots).await?;
        match self.recv().await? {
            ClientEvent::Robots { robots } => Ok(robots),
            other => Err(anyhow!("Expected robots reply, got {other:?}")),
        }
    }

    pub async fn send(&mut self, request: &ClientRequest) -> anyhow::Result<()> {
        self.conn.send_json(request).await
    }

    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.conn.send_raw(text).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<ClientEvent> {
        self.conn.next_json().await
    }

    pub async fn close(self) -> anyhow::Result<()> {
        self.conn.close().await
    }
}
