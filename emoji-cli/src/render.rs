//! Plain-text rendering of the gallery for the terminal.

use emoji_shared::types::EmojiRecord;

const PLACEHOLDER_ROWS: usize = 8;

pub fn render_item(emoji: &EmojiRecord) -> String {
    let heart = if emoji.is_liked() { "♥" } else { "♡" };
    format!(
        "#{:<6} {heart} {:<9} {}\n        {}",
        emoji.id,
        emoji.likes_label(),
        emoji.prompt,
        emoji.image_url
    )
}

/// Newest first; an empty gallery renders as placeholder rows.
pub fn render_gallery(items: &[EmojiRecord]) -> String {
    if items.is_empty() {
        return vec!["#…      ░░░░░░░░░░░░░░░░"; PLACEHOLDER_ROWS].join("\n");
    }
    items.iter().map(render_item).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, likes_count: Option<i32>) -> EmojiRecord {
        EmojiRecord {
            id,
            image_url: format!("https://store/{id}.png"),
            prompt: "cat".into(),
            creator_user_id: "u1".into(),
            likes_count,
            created_at: None,
        }
    }

    #[test]
    fn labels_follow_the_count() {
        assert!(render_item(&record(1, Some(1))).contains("♥ 1 like "));
        assert!(render_item(&record(2, None)).contains("♡ 0 likes"));
    }

    #[test]
    fn empty_gallery_has_eight_placeholders() {
        assert_eq!(render_gallery(&[]).lines().count(), PLACEHOLDER_ROWS);
    }
}
