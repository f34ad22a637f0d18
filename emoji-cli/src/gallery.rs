use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use emoji_shared::types::EmojiRecord;

use crate::api::{ClientError, GalleryApi};

/// Local, newest-first view of the shared gallery.
///
/// `load` replaces the sequence wholesale; live inserts are prepended as they
/// arrive, without dedup or re-sorting, so an insert that races a `load` can
/// show up twice until the next `load`.
pub struct GallerySync<A> {
    api: Arc<A>,
    items: Arc<Mutex<Vec<EmojiRecord>>>,
}

impl<A> Clone for GallerySync<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            items: self.items.clone(),
        }
    }
}

fn lock(items: &Mutex<Vec<EmojiRecord>>) -> MutexGuard<'_, Vec<EmojiRecord>> {
    items.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: GalleryApi + 'static> GallerySync<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn items(&self) -> Vec<EmojiRecord> {
        lock(&self.items).clone()
    }

    pub async fn load(&self) -> Result<(), ClientError> {
        let rows = self.api.list().await?;
        tracing::debug!(count = rows.len(), "gallery loaded");
        *lock(&self.items) = rows;
        Ok(())
    }

    pub fn apply_insert(&self, record: EmojiRecord) {
        lock(&self.items).insert(0, record);
    }

    /// Starts applying live inserts. Each applied record is also handed to the
    /// returned subscription for callers that want to react to it.
    pub async fn subscribe_inserts(&self) -> Result<Subscription, ClientError> {
        let mut stream = self.api.inserts().await?;
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = self.clone();

        let task = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(record) => {
                        sync.apply_insert(record.clone());
                        // Receiver gone only means nobody is watching the handle.
                        let _ = tx.send(record);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "gallery insert feed failed");
                        break;
                    }
                }
            }
            tracing::debug!("gallery insert feed ended");
        });

        Ok(Subscription { task, inserts: rx })
    }

    /// Flips the like flag. The local row changes only once the server has
    /// stored the new value; failures are logged and leave the row untouched.
    pub async fn toggle_like(&self, id: i64) -> Option<EmojiRecord> {
        match self.api.toggle_like(id).await {
            Ok(updated) => {
                let mut items = lock(&self.items);
                for item in items.iter_mut().filter(|item| item.id == id) {
                    *item = updated.clone();
                }
                Some(updated)
            }
            Err(e) => {
                tracing::error!(emoji_id = id, error = %e, "error toggling like");
                None
            }
        }
    }
}

/// Live insert subscription. Ends the connection on `close` or drop.
pub struct Subscription {
    task: JoinHandle<()>,
    inserts: mpsc::UnboundedReceiver<EmojiRecord>,
}

impl Subscription {
    /// Next record applied from the feed; `None` once the feed has ended.
    pub async fn next_insert(&mut self) -> Option<EmojiRecord> {
        self.inserts.recv().await
    }

    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
