//! Logging infrastructure
//!
//! Structured logging with tracing for the library and the command line tool.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogGuard};
