use std::sync::Arc;

use tokio::sync::broadcast;

use maloga_types::events::{ChangeOp, GatewayEvent, Watched};

/// Fans invalidation events out to all connected clients.
///
/// Events are fire-and-forget: a send with no receivers, a lagged receiver,
/// or a dropped connection loses events without consequence, because every
/// event only tells clients to re-read state they can fetch at any time.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<GatewayEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Subscribe to gateway events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients.
    pub fn broadcast(&self, event: GatewayEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Announce that rows in `table` changed. Write handlers call this after
    /// every successful mutation.
    pub fn notify(&self, table: Watched, op: ChangeOp) {
        self.broadcast(GatewayEvent::Change { table, op });
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_reaches_subscribers() {
        let dispatcher = Dispatcher::new();
        let mut rx = dispatcher.subscribe();

        dispatcher.notify(Watched::Questions, ChangeOp::Insert);

        match rx.recv().await.unwrap() {
            GatewayEvent::Change { table, op } => {
                assert_eq!(table, Watched::Questions);
                assert_eq!(op, ChangeOp::Insert);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn broadcast_without_receivers_is_harmless() {
        let dispatcher = Dispatcher::new();
        // No subscriber exists; the send must not error or panic.
        dispatcher.notify(Watched::Videos, ChangeOp::Delete);
    }
}
