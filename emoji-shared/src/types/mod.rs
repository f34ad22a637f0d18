pub mod api;
pub mod auth;
pub mod emoji;
pub mod event;

pub use api::*;
pub use auth::*;
pub use emoji::*;
pub use event::*;
