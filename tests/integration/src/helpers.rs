//! Test helpers for integration tests
//!
//! Provides a test server, a WebSocket client and polling helpers for
//! state that changes asynchronously on the server.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::AppConfig;
use chat_core::{ChatId, UserId};
use chat_db::InMemoryStore;
use chat_gateway::{create_app, GatewayState};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Default wait for an expected event
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to listen when asserting that nothing arrives
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: InMemoryStore,
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with local defaults
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::local(), InMemoryStore::new()).await
    }

    /// Start a server over pre-seeded storage
    pub async fn start_with_store(store: InMemoryStore) -> Result<Self> {
        Self::start_with_config(AppConfig::local(), store).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig, store: InMemoryStore) -> Result<Self> {
        let state = GatewayState::new(config, &store)?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket endpoint, optionally with a token
    pub fn ws_url(&self, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}/ws?token={token}", self.addr),
            None => format!("ws://{}/ws", self.addr),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).send().await?)
    }

    /// Open an unauthenticated WebSocket connection
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url(None)).await
    }

    /// Connect and bind as `user` via a `connect` event, waiting until the
    /// server has registered the connection
    pub async fn connect_as(&self, user: i64) -> Result<WsClient> {
        let mut ws = self.connect().await?;
        ws.send(&crate::fixtures::connect(user)).await?;
        self.wait_until(|state| state.registry().is_online(UserId::new(user)))
            .await
            .with_context(|| format!("user {user} never came online"))?;
        Ok(ws)
    }

    /// Connect as `user` and join a live room
    pub async fn join_as(&self, user: i64, chat_id: ChatId) -> Result<WsClient> {
        let mut ws = self.connect_as(user).await?;
        ws.send(&crate::fixtures::join(user, chat_id)).await?;
        self.wait_until(|state| state.rooms().is_member(UserId::new(user), chat_id))
            .await
            .with_context(|| format!("user {user} never joined {chat_id}"))?;
        Ok(ws)
    }

    /// Poll server state until `condition` holds
    pub async fn wait_until(&self, condition: impl Fn(&GatewayState) -> bool) -> Result<()> {
        let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
        while !condition(&self.state) {
            if tokio::time::Instant::now() >= deadline {
                bail!("condition not reached within {EVENT_TIMEOUT:?}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

/// WebSocket test client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = connect_async(url).await.context("WebSocket connect failed")?;
        Ok(Self { stream })
    }

    /// Send a JSON event
    pub async fn send(&mut self, event: &Value) -> Result<()> {
        self.stream.send(Message::Text(event.to_string())).await?;
        Ok(())
    }

    /// Send a raw text frame
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Next decoded event, or `None` if nothing arrives within `wait`
    pub async fn next_event(&mut self, wait: Duration) -> Result<Option<Value>> {
        loop {
            let next = match tokio::time::timeout(wait, self.stream.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(None),
            };
            match next {
                Some(Ok(Message::Text(text))) => return Ok(Some(serde_json::from_str(&text)?)),
                Some(Ok(Message::Close(frame))) => bail!("connection closed: {frame:?}"),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => bail!("stream ended"),
            }
        }
    }

    /// Wait for the next event of `event_type`, skipping others
    pub async fn expect(&mut self, event_type: &str) -> Result<Value> {
        let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match self.next_event(remaining).await? {
                Some(event) if event["type"] == event_type => return Ok(event),
                Some(_) => {}
                None => bail!("no {event_type} event within {EVENT_TIMEOUT:?}"),
            }
        }
    }

    /// Assert that no event of `event_type` arrives during the quiet period
    pub async fn expect_none(&mut self, event_type: &str) -> Result<()> {
        let deadline = tokio::time::Instant::now() + QUIET_PERIOD;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            match self.next_event(remaining).await? {
                Some(event) if event["type"] == event_type => {
                    bail!("unexpected {event_type} event: {event}")
                }
                Some(_) => {}
                None => return Ok(()),
            }
        }
    }

    /// Latest `online_users_list` received during the quiet period
    pub async fn latest_online_list(&mut self) -> Result<Option<Value>> {
        let mut latest = None;
        while let Some(event) = self.next_event(QUIET_PERIOD).await? {
            if event["type"] == "online_users_list" {
                latest = Some(event["data"]["online_users"].clone());
            }
        }
        Ok(latest)
    }

    /// Wait for the server's close frame and return its code
    pub async fn expect_close(&mut self) -> Result<u16> {
        let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, self.stream.next()).await {
                Err(_) => bail!("no close frame within {EVENT_TIMEOUT:?}"),
                Ok(Some(Ok(Message::Close(Some(frame))))) => return Ok(u16::from(frame.code)),
                Ok(Some(Ok(Message::Close(None)))) => bail!("close frame without code"),
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(e))) => return Err(e.into()),
                Ok(None) => bail!("stream ended without close frame"),
            }
        }
    }

    /// Close the connection from the client side
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
