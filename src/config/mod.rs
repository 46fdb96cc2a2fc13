//! 配置管理
//!
//! 静态配置来自默认值、`config.toml`、`config.<APP_ENV>.toml` 与环境变量。

mod r#impl;
mod structs;

pub use structs::*;
