use emoji_shared::types::EmojiRecord;

use super::escape;

/// Placeholder cells shown while the gallery has nothing to show.
pub const SKELETON_CELLS: usize = 8;

const LIKED_COLOR: &str = "#ef4444";

const DOWNLOAD_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="black" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="7 10 12 15 17 10"/><line x1="12" y1="15" x2="12" y2="3"/></svg>"#;

const HEART_PATH: &str = "M20.84 4.61a5.5 5.5 0 0 0-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 0 0-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 0 0 0-7.78z";

fn heart_icon(liked: bool) -> String {
    let (fill, stroke) = if liked {
        (LIKED_COLOR, LIKED_COLOR)
    } else {
        ("none", "black")
    };
    format!(
        r#"<svg class="heart" xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="{fill}" stroke="{stroke}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="{HEART_PATH}"/></svg>"#
    )
}

/// The gallery grid: one cell per row in the given order, or the skeleton.
pub fn render_grid(emojis: &[EmojiRecord]) -> String {
    let cells = if emojis.is_empty() {
        skeleton()
    } else {
        emojis.iter().map(render_item).collect::<Vec<_>>().join("\n")
    };
    format!(r#"<div id="gallery" class="grid">{cells}</div>"#)
}

pub fn skeleton() -> String {
    r#"<div class="cell skeleton"></div>"#.repeat(SKELETON_CELLS)
}

pub fn render_item(emoji: &EmojiRecord) -> String {
    item_markup(
        &emoji.id.to_string(),
        &escape(&emoji.image_url),
        &escape(&emoji.prompt),
        emoji.is_liked(),
        &escape(&emoji.likes_label()),
    )
}

/// Client-side clone target for inserts arriving over the live stream.
pub fn item_template() -> String {
    format!(
        r#"<template id="emoji-item">{}</template>"#,
        item_markup("", "", "", false, "0 likes")
    )
}

fn item_markup(id: &str, image_url: &str, prompt: &str, liked: bool, label: &str) -> String {
    let liked_class = if liked { " liked" } else { "" };
    format!(
        r#"<div class="cell item{liked_class}" data-id="{id}" data-url="{image_url}">
  <div class="frame">
    <img src="{image_url}" alt="{prompt}" loading="lazy">
    <div class="overlay">
      <button type="button" class="download" aria-label="Download emoji">{DOWNLOAD_ICON}</button>
      <button type="button" class="like" aria-label="Like emoji">{heart}</button>
    </div>
  </div>
  <div class="caption"><span class="prompt">{prompt}</span><span class="likes">{label}</span></div>
</div>"#,
        heart = heart_icon(liked),
    )
}
