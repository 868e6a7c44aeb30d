// Dragonfly imgproxy proxy library

pub mod config;
pub mod constants;
pub mod dragonfly;
pub mod error;
pub mod logging;
pub mod pipeline; // Per-request context
pub mod proxy;
