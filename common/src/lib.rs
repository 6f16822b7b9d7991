//! Shared building blocks for the mongo-mcp workspace.
//!
//! - 错误类型与结果别名
//! - 分层配置解析（缓存 → 环境变量 → 配置文件 → 内置默认值）
//! - 参数模型与校验
//! - 统一响应信封

pub mod config;
pub mod errors;
pub mod models;
pub mod response;
pub mod utils;
