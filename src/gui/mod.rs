//! GUI module for the body measurement analyzer.
//!
//! Provides a graphical user interface using Iced.

pub mod app;
pub mod logger;

pub use app::BodyMeasureApp;
pub use logger::{LogEntry, LogLevel, Logger};
