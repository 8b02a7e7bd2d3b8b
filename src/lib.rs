// Library surface for headless/integration tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod logging;
pub mod outcome;
pub mod runtime;
pub mod session;
pub mod ui;
