//! Integration tests — full session lifecycle over a real TCP
//! connection on localhost, driving the worker exactly the way the
//! authoring tool does: raw little-endian frames, strict
//! request/response ordering.

use std::time::Duration;

use bytes::Bytes;
use previz_core::{
    BridgeError, BridgeSession, FrameStore, UpdateDrain, connect_with_retry, update_channel,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// ── Helpers ──────────────────────────────────────────────────────

/// Stand up a connected worker session against an in-test peer.
/// Returns the peer's socket, the drain half of the update queue, the
/// shared frame store, and the session task handle.
async fn session_pair() -> (
    TcpStream,
    UpdateDrain,
    FrameStore,
    JoinHandle<Result<(), BridgeError>>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let dial =
        tokio::spawn(
            async move { connect_with_retry(&addr, 3, Duration::from_millis(10)).await },
        );
    let (peer, _) = listener.accept().await.unwrap();
    let stream = dial.await.unwrap().unwrap();

    let (tx, rx) = update_channel();
    let frames = FrameStore::new();
    let session = BridgeSession::new(stream, tx, frames.clone());
    let handle = tokio::spawn(session.run());

    (peer, rx, frames, handle)
}

/// Send one content update and consume its single-byte ack.
async fn send_content(peer: &mut TcpStream, body: &[u8]) {
    peer.write_all(&0u16.to_le_bytes()).await.unwrap();
    peer.write_all(&(body.len() as u32).to_le_bytes())
        .await
        .unwrap();
    peer.write_all(body).await.unwrap();

    let mut ack = [0u8; 1];
    peer.read_exact(&mut ack).await.unwrap();
    assert_eq!(ack[0], 0);
}

/// Send one frame request and read back (width, height, pixels).
async fn request_frame(peer: &mut TcpStream, dt: f32) -> (u16, u16, Vec<u8>) {
    peer.write_all(&1u16.to_le_bytes()).await.unwrap();
    peer.write_all(&dt.to_le_bytes()).await.unwrap();

    let mut header = [0u8; 4];
    peer.read_exact(&mut header).await.unwrap();
    let width = u16::from_le_bytes([header[0], header[1]]);
    let height = u16::from_le_bytes([header[2], header[3]]);

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    peer.read_exact(&mut pixels).await.unwrap();
    (width, height, pixels)
}

// ── Content updates ──────────────────────────────────────────────

#[tokio::test]
async fn content_update_round_trip() {
    let (mut peer, mut drain, _frames, _handle) = session_pair().await;

    // 13-byte document, acked with a single zero byte.
    send_content(&mut peer, br#"{"a": [1, 2]}"#).await;

    let drained = drain.drain_all();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].document(), &json!({"a": [1, 2]}));
}

#[tokio::test]
async fn updates_drain_in_send_order_exactly_once() {
    let (mut peer, mut drain, _frames, _handle) = session_pair().await;

    for i in 0..5 {
        let body = format!(r#"{{"seq": {i}}}"#);
        send_content(&mut peer, body.as_bytes()).await;
    }
    // Frame requests interleaved after the updates must not disturb
    // queue contents or order.
    let _ = request_frame(&mut peer, 0.016).await;
    let _ = request_frame(&mut peer, 0.016).await;

    let drained = drain.drain_all();
    assert_eq!(drained.len(), 5);
    for (i, update) in drained.iter().enumerate() {
        assert_eq!(update.document(), &json!({"seq": i}));
    }
    assert!(drain.drain_all().is_empty());
}

#[tokio::test]
async fn fragmented_delivery_decodes_like_single_shot() {
    let (mut peer, mut drain, _frames, _handle) = session_pair().await;

    let body = br#"{"meshes": {"Cube": {"vertices": 8}}}"#;
    let mut wire = Vec::new();
    wire.extend_from_slice(&0u16.to_le_bytes());
    wire.extend_from_slice(&(body.len() as u32).to_le_bytes());
    wire.extend_from_slice(body);

    // One byte per write, flushed each time.
    for byte in wire {
        peer.write_all(&[byte]).await.unwrap();
        peer.flush().await.unwrap();
    }
    let mut ack = [0u8; 1];
    peer.read_exact(&mut ack).await.unwrap();
    assert_eq!(ack[0], 0);

    let drained = drain.drain_all();
    assert_eq!(drained.len(), 1);
    assert_eq!(
        drained[0].document(),
        &json!({"meshes": {"Cube": {"vertices": 8}}})
    );
}

// ── Frame requests ───────────────────────────────────────────────

#[tokio::test]
async fn frame_request_returns_published_snapshot() {
    let (mut peer, _drain, frames, _handle) = session_pair().await;

    let pixels: Vec<u8> = (0u8..24).collect();
    frames.publish(4, 2, Bytes::from(pixels.clone()));

    let (width, height, body) = request_frame(&mut peer, 0.016).await;
    assert_eq!((width, height), (4, 2));
    assert_eq!(body, pixels);
}

#[tokio::test]
async fn frame_request_before_first_render_serves_placeholder() {
    let (mut peer, _drain, _frames, _handle) = session_pair().await;

    let (width, height, body) = request_frame(&mut peer, 0.0).await;
    assert_eq!((width, height), (1, 1));
    assert_eq!(body, vec![0, 0, 0]);
}

// ── Unknown ids ──────────────────────────────────────────────────

#[tokio::test]
async fn unknown_id_is_acked_and_changes_nothing() {
    let (mut peer, mut drain, frames, _handle) = session_pair().await;
    let before = frames.latest();

    peer.write_all(&7u16.to_le_bytes()).await.unwrap();
    let mut ack = [0u8; 1];
    peer.read_exact(&mut ack).await.unwrap();
    assert_eq!(ack[0], 0);

    assert!(drain.drain_all().is_empty());
    assert_eq!(frames.latest(), before);

    // The session is still live afterwards.
    send_content(&mut peer, b"{}").await;
    assert_eq!(drain.drain_all().len(), 1);
}

// ── Session termination ──────────────────────────────────────────

#[tokio::test]
async fn peer_disconnect_ends_session_cleanly() {
    let (peer, _drain, _frames, handle) = session_pair().await;

    drop(peer);
    let result = handle.await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn malformed_document_is_fatal() {
    let (mut peer, _drain, _frames, handle) = session_pair().await;

    peer.write_all(&0u16.to_le_bytes()).await.unwrap();
    peer.write_all(&5u32.to_le_bytes()).await.unwrap();
    peer.write_all(b"{nope").await.unwrap();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(BridgeError::Payload(_))));
}

// ── Connect retry budget ─────────────────────────────────────────

#[tokio::test]
async fn connect_retry_budget_is_exhausted_exactly_once() {
    // Grab a port that is guaranteed closed by binding and dropping.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = connect_with_retry(&addr, 3, Duration::from_millis(10)).await;
    match result {
        Err(BridgeError::Connect { attempts }) => assert_eq!(attempts, 3),
        other => panic!("expected Connect error, got {other:?}"),
    }
}
