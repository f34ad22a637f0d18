mod auth_extractor;
mod metrics_layer;
mod session;
mod tracing_layer;

pub use auth_extractor::*;
pub use metrics_layer::*;
pub use session::*;
pub use tracing_layer::*;
