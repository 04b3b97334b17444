use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::DeliveryError;

pub type CallbackPayload = Result<Value, DeliveryError>;

const CALLBACK_PREFIX: &str = "sheetrelay_cb_";

/// Process-wide table of outstanding script-tag callbacks, keyed by callback id.
#[derive(Default)]
pub struct CallbackRegistry {
    pending: DashMap<String, oneshot::Sender<CallbackPayload>>,
}

impl CallbackRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a fresh callback id. The entry lives exactly as long as the
    /// returned guard.
    pub fn register(self: &Arc<Self>) -> (PendingCallback, oneshot::Receiver<CallbackPayload>) {
        let id = format!("{CALLBACK_PREFIX}{}", Uuid::now_v7().simple());
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id.clone(), tx);

        let guard = PendingCallback {
            id,
            registry: Arc::clone(self),
            loader: None,
        };
        (guard, rx)
    }

    /// Invoke a registered callback. Returns false if nothing is waiting on `id`.
    pub fn dispatch(&self, id: &str, payload: CallbackPayload) -> bool {
        match self.pending.remove(id) {
            Some((_, tx)) => tx.send(payload).is_ok(),
            None => {
                tracing::debug!("Dropping payload for unknown callback {id}");
                false
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Owns one registry entry and the loader task feeding it. Dropping the guard
/// removes the entry and aborts the loader, so nothing can fire late.
pub struct PendingCallback {
    id: String,
    registry: Arc<CallbackRegistry>,
    loader: Option<JoinHandle<()>>,
}

impl PendingCallback {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attach_loader(&mut self, loader: JoinHandle<()>) {
        self.loader = Some(loader);
    }
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.abort();
        }
        self.registry.pending.remove(&self.id);
    }
}
