use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber, Layer, Registry};

/// 文件日志的后台写入句柄，丢弃后未落盘的日志会丢失
pub struct LogGuards {
    _info_guard: WorkerGuard,
    _error_guard: WorkerGuard,
}

// 设置日志
//
// APP_ENV=LOCAL（默认）输出到终端，其他环境按天滚动写入 log_files/。
pub fn setup_logging() -> anyhow::Result<Option<LogGuards>> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "LOCAL".to_string());

    if app_env == "LOCAL" {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(true)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    }

    let info_file = RollingFileAppender::new(Rotation::DAILY, "log_files", "info.log");
    let error_file = RollingFileAppender::new(Rotation::DAILY, "log_files", "error.log");

    let (info_non_blocking, info_guard) = tracing_appender::non_blocking(info_file);
    let (error_non_blocking, error_guard) = tracing_appender::non_blocking(error_file);

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(info_non_blocking)
                .with_filter(EnvFilter::new("info")),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_writer(error_non_blocking)
                .with_filter(EnvFilter::new("error")),
        );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(Some(LogGuards {
        _info_guard: info_guard,
        _error_guard: error_guard,
    }))
}
