//! Logging abstractions used by the registry

mod noop;
mod tracing_logger;
mod traits;

pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
pub use traits::{Logger, LoggerExt, SharedLogger};
