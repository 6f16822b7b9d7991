//! 连接服务模块
//!
//! Turns connection outcomes into response envelopes. Nothing raised by the
//! driver crosses this boundary.

use common::models::ConnectionParams;
use common::response::ResponseEnvelope;

use crate::connection_manager::{ConnectionHandle, ConnectionManager};

/// Envelope-producing front of the [`ConnectionManager`].
#[derive(Debug, Default)]
pub struct ConnectionService {
    manager: ConnectionManager,
}

impl ConnectionService {
    /// 创建新的连接服务实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立连接并执行健康检查
    pub async fn connect(&mut self, params: &ConnectionParams) -> ResponseEnvelope {
        match self.manager.open(params).await {
            Ok(handle) => ResponseEnvelope::ok(connected_message(handle)),
            Err(e) => {
                tracing::error!(database = %params.database, error = %e, "Error connecting to MongoDB");
                ResponseEnvelope::err(format!("Failed to connect to MongoDB: {}", e))
            }
        }
    }

    /// The live handle, if the last successful connect is still open.
    pub fn handle(&self) -> Option<&ConnectionHandle> {
        self.manager.handle()
    }

    /// 关闭连接
    pub async fn close(&mut self) {
        self.manager.close().await;
    }
}

fn connected_message(handle: &ConnectionHandle) -> String {
    format!(
        "Successfully connected to MongoDB database '{}' at {}",
        handle.database_name(),
        handle.host()
    )
}
