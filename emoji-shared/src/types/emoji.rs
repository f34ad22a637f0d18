use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated image as stored in the `emojis` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiRecord {
    pub id: i64,
    pub image_url: String,
    pub prompt: String,
    pub creator_user_id: String,
    pub likes_count: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl EmojiRecord {
    /// Missing counts read as zero.
    pub fn likes(&self) -> i32 {
        self.likes_count.unwrap_or(0)
    }

    pub fn is_liked(&self) -> bool {
        self.likes() != 0
    }

    /// "1 like" / "N likes".
    pub fn likes_label(&self) -> String {
        let likes = self.likes();
        if likes == 1 {
            "1 like".to_string()
        } else {
            format!("{likes} likes")
        }
    }
}

/// The like flag is binary: a positive count flips to 0, anything else to 1.
pub fn toggled_likes(current: Option<i32>) -> i32 {
    if current.unwrap_or(0) > 0 { 0 } else { 1 }
}
