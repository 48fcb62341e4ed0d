//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Human or JSON output on stderr, keeping stdout for command output
//! - Optional rolling JSON log files via tracing-appender

pub mod logger;

pub use logger::LoggerImpl;
