//! Insert change feed for the `emojis` table.
//!
//! Every row the service persists is fanned out to all live subscribers
//! (one per open gallery stream) over a `tokio::sync::broadcast` channel.
//! Subscribers that fall behind lose the oldest events and are told so.

use tokio::sync::broadcast;
use tracing::debug;

use emoji_shared::types::{event_types, EmojiRecord, Event};

pub type EmojiEvent = Event<EmojiRecord>;

const SOURCE: &str = "emoji-maker";
const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EmojiFeed {
    tx: broadcast::Sender<EmojiEvent>,
}

impl EmojiFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns the number of subscribers the event reached.
    pub fn publish_insert(&self, record: EmojiRecord) -> usize {
        let event = Event::new(SOURCE, event_types::EMOJI_INSERTED, record);
        let event_id = event.id;
        // Err only means nobody is listening right now.
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(event_id = %event_id, delivered, "emoji insert published");
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EmojiEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EmojiFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
