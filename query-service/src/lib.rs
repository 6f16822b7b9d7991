//! MongoDB 查询执行
//!
//! 提供有界 find 查询功能，包括：
//! - 过滤条件转换
//! - 结果数量限制
//! - 结果格式化为可展示文本

pub mod format;
pub mod service;
pub mod store;

pub use service::QueryService;
pub use store::DocumentStore;
