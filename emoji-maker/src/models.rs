use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use emoji_shared::types::EmojiRecord;

use crate::schema::{emojis, profiles};

// --- Emoji ---

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = emojis)]
pub struct Emoji {
    pub id: i64,
    pub image_url: String,
    pub prompt: String,
    pub creator_user_id: String,
    pub likes_count: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Emoji> for EmojiRecord {
    fn from(row: Emoji) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            prompt: row.prompt,
            creator_user_id: row.creator_user_id,
            likes_count: row.likes_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = emojis)]
pub struct NewEmoji {
    pub image_url: String,
    pub prompt: String,
    pub creator_user_id: String,
    pub likes_count: i32,
}

// --- Profile ---

/// Tier assigned to every new profile. Upgrades are managed outside this service.
pub const DEFAULT_TIER: &str = "free";

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = profiles, primary_key(user_id))]
pub struct Profile {
    pub user_id: String,
    pub credits: i32,
    pub tier: String,
}

pub const DEFAULT_CREDITS: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: String,
    pub credits: i32,
    pub tier: String,
}

impl NewProfile {
    /// Profile handed to a user the first time they are seen.
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            credits: DEFAULT_CREDITS,
            tier: DEFAULT_TIER.to_string(),
        }
    }
}
