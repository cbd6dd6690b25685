//! Arrival-ordered handoff of content updates from the network task to
//! the render tick.
//!
//! Single producer (the session loop), single consumer (the scene-sync
//! task). Pushes never block the network side, and the drain never
//! blocks the render tick: queue order is update-application order.

use tokio::sync::mpsc;

use crate::error::BridgeError;
use crate::update::ContentUpdate;

/// Create the bridge's update channel.
pub fn update_channel() -> (UpdateSender, UpdateDrain) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UpdateSender { tx }, UpdateDrain { rx })
}

/// Producer half, owned by the session.
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::UnboundedSender<ContentUpdate>,
}

impl UpdateSender {
    /// Enqueue a decoded content update. Never blocks; fails only when
    /// the drain half has been dropped, which ends the session.
    pub fn push(&self, update: ContentUpdate) -> Result<(), BridgeError> {
        self.tx.send(update).map_err(|_| BridgeError::ChannelClosed)
    }
}

/// Consumer half, owned by the render tick.
#[derive(Debug)]
pub struct UpdateDrain {
    rx: mpsc::UnboundedReceiver<ContentUpdate>,
}

impl UpdateDrain {
    /// Remove and return every queued update in arrival order, leaving
    /// the queue empty. Never blocks: when nothing is pending the tick
    /// gets an empty vec and proceeds.
    pub fn drain_all(&mut self) -> Vec<ContentUpdate> {
        let mut drained = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            drained.push(update);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drain_preserves_arrival_order() {
        let (tx, mut rx) = update_channel();
        for i in 0..5 {
            tx.push(ContentUpdate::new(json!({"seq": i}))).unwrap();
        }

        let drained = rx.drain_all();
        assert_eq!(drained.len(), 5);
        for (i, update) in drained.iter().enumerate() {
            assert_eq!(update.document(), &json!({"seq": i}));
        }
    }

    #[test]
    fn drain_empties_the_queue() {
        let (tx, mut rx) = update_channel();
        tx.push(ContentUpdate::new(json!({}))).unwrap();

        assert_eq!(rx.drain_all().len(), 1);
        assert!(rx.drain_all().is_empty());
    }

    #[test]
    fn empty_queue_drains_to_empty_vec() {
        let (_tx, mut rx) = update_channel();
        assert!(rx.drain_all().is_empty());
    }

    #[test]
    fn push_after_drain_drop_reports_closed() {
        let (tx, rx) = update_channel();
        drop(rx);

        let err = tx.push(ContentUpdate::new(json!({}))).unwrap_err();
        assert!(matches!(err, BridgeError::ChannelClosed));
    }
}
