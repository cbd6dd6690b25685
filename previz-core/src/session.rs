//! Outbound connection management and the session receive loop.
//!
//! The worker is the client: it dials the authoring tool's loopback
//! listener with a bounded retry budget, then hands the socket to a
//! [`BridgeSession`] running on its own task. The loop is strictly
//! half-duplex (every inbound message is answered before the next is
//! read) and it never touches scene or surface state: content updates
//! go onto the queue, frame replies come out of the snapshot store.
//!
//! There is no cancellation primitive. A session ends only when the
//! peer closes the socket or a fatal error occurs; the worker's
//! supervisor observes the task finishing and exits the whole process
//! rather than keep rendering against a dead link.

use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::codec::BridgeCodec;
use crate::error::BridgeError;
use crate::message::{Message, Reply};
use crate::queue::UpdateSender;
use crate::snapshot::FrameStore;

/// Default connect retry budget.
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;

/// Default sleep between failed connect attempts.
pub const DEFAULT_CONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Connect to the authoring tool, retrying up to `attempts` times with
/// `backoff` sleep between failures. Exhausting the budget is fatal to
/// the worker; no further retries happen anywhere else.
pub async fn connect_with_retry(
    addr: &str,
    attempts: u32,
    backoff: Duration,
) -> Result<TcpStream, BridgeError> {
    for attempt in 1..=attempts {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                info!(%addr, attempt, "connected to authoring tool");
                return Ok(stream);
            }
            Err(e) => {
                warn!(%addr, attempt, error = %e, "connect attempt failed");
                if attempt < attempts {
                    sleep(backoff).await;
                }
            }
        }
    }
    Err(BridgeError::Connect { attempts })
}

/// One live bridge session over an established connection.
pub struct BridgeSession {
    framed: Framed<TcpStream, BridgeCodec>,
    updates: UpdateSender,
    frames: FrameStore,
}

impl BridgeSession {
    /// Take exclusive ownership of the socket.
    pub fn new(stream: TcpStream, updates: UpdateSender, frames: FrameStore) -> Self {
        Self {
            framed: Framed::new(stream, BridgeCodec),
            updates,
            frames,
        }
    }

    /// Run the receive loop until the peer closes the connection
    /// (`Ok`) or a fatal protocol/socket error occurs (`Err`). Either
    /// way the session is over; the caller turns this into process
    /// exit.
    pub async fn run(mut self) -> Result<(), BridgeError> {
        while let Some(message) = self.framed.next().await {
            match message? {
                Message::ContentUpdate(update) => {
                    self.updates.push(update)?;
                    self.framed.send(Reply::Ack).await?;
                }
                Message::FrameRequest { dt } => {
                    let started = Instant::now();
                    // Lock held only for the clone; the send happens
                    // outside it so network latency never stalls the
                    // render tick's publish.
                    let snapshot = self.frames.latest();
                    let bytes = snapshot.pixels().len();
                    self.framed.send(Reply::Frame(snapshot)).await?;
                    debug!(
                        dt,
                        bytes,
                        elapsed_us = started.elapsed().as_micros() as u64,
                        "frame request served"
                    );
                }
                Message::Unknown { id } => {
                    warn!(id, "unknown message id, acknowledging");
                    self.framed.send(Reply::Ack).await?;
                }
            }
        }
        info!("authoring tool closed the connection");
        Ok(())
    }
}
