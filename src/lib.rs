// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod sentences;
pub mod session;
pub mod similarity;
pub mod time_series;
pub mod ui;
