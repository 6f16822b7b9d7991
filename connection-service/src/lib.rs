//! MongoDB 连接管理
//!
//! 提供单个数据库连接的生命周期管理：
//! - 建立连接并执行 ping 健康检查
//! - 连接句柄复用
//! - 重连时关闭旧句柄，退出时关闭连接

pub mod connection_manager;
pub mod service;

pub use connection_manager::{ConnectionHandle, ConnectionManager};
pub use service::ConnectionService;
