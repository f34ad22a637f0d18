pub mod feed;

pub use feed::{EmojiEvent, EmojiFeed};
