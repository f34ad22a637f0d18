pub mod emojis;
pub mod generate;
pub mod health;
pub mod pages;
pub mod stream;
