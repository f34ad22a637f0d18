use emoji_shared::types::{toggled_likes, EmojiRecord};

use super::ports::{EmojiRepository, StoreError};

/// Flips the binary like flag on one emoji and returns the stored row.
///
/// Plain read-then-write: two concurrent toggles on the same row race and
/// the last write wins.
pub async fn toggle_like(emojis: &dyn EmojiRepository, id: i64) -> Result<EmojiRecord, StoreError> {
    let current = emojis.likes_count(id).await?;
    let next = toggled_likes(current);
    let record = emojis.set_likes_count(id, next).await?;
    tracing::debug!(emoji_id = id, likes_count = next, "like toggled");
    Ok(record)
}
