//! Client half of the shared gallery: load, live inserts, likes, downloads.

pub mod api;
pub mod download;
pub mod gallery;
pub mod render;
pub mod sse;

pub use api::{ClientError, GalleryApi, HttpGalleryApi};
pub use gallery::{GallerySync, Subscription};
