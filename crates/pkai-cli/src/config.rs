//! Layered configuration of the `predict` command.
//!
//! Values come from built-in [`defaults`], an optional TOML [`file`], `--set`
//! overrides and command-line flags, merged by [`builder`] into an
//! [`AppConfig`](models::AppConfig).

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
