//! mongo-mcp 命令行入口
//!
//! 按以下流程执行：
//! - 解析配置（缓存 → 环境变量 → 配置文件 → 内置默认值）
//! - 校验参数
//! - 连接 MongoDB 并执行 ping
//! - 执行有界 find 查询并输出结果信封

mod args;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Command};
use common::config::Resolution;
use common::errors::AppResult;
use common::response::ResponseEnvelope;
use common::utils::IdGenerator;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file (if present) before anything else
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // 初始化日志追踪（输出到 stderr，stdout 只输出结果）
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .try_init()?;

    let run_id = IdGenerator::run_id();
    let span = tracing::info_span!("run", run_id = %run_id);

    match run(cli).instrument(span).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "Run aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Returns whether every envelope of the run succeeded.
async fn run(cli: Cli) -> AppResult<bool> {
    let command = cli.command();
    let resolver = cli.resolver();
    let resolution = resolver.resolve()?;

    let mut session = Session::new(resolver, resolution).with_echo_config(cli.echo_config);

    let outcome = match command {
        Command::Resolve => {
            print_resolution(session.resolution())?;
            return Ok(true);
        }
        Command::Connect => {
            tracing::info!("Connecting to MongoDB...");
            session.connect().await.map(|e| vec![e])
        }
        Command::Find => {
            tracing::info!("Querying MongoDB...");
            session.find().await.map(|e| vec![e])
        }
        Command::Run => session.run().await,
    };

    // 确保在完成后关闭连接
    session.shutdown().await;

    let envelopes = outcome?;
    for envelope in &envelopes {
        print_envelope(envelope)?;
    }
    Ok(envelopes.iter().all(|e| !e.is_error))
}

fn print_resolution(resolution: &Resolution) -> AppResult<()> {
    let trace = serde_json::json!({
        "source": resolution.source,
        "attempts": resolution.attempts,
        "config": resolution.config.redacted(),
    });
    println!("{}", serde_json::to_string_pretty(&trace)?);
    Ok(())
}

fn print_envelope(envelope: &ResponseEnvelope) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}
