use monitor_core::MonitorError;
use monitor_core::constants::dashboard;
use monitor_core::paginate::Page;
use std::path::Path;
use tracing::error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

/// # Backup Monitor 日志系统使用说明
///
/// ## 基本原则
/// 1. **库代码只使用 `tracing` 宏**：`info!()`, `warn!()`, `error!()`, `debug!()`
/// 2. **应用入口控制日志配置**：在 `main.rs` 中调用 `setup_logging()`
/// 3. **仪表盘模式日志写入文件**：避免日志破坏终端界面
///
/// ## 环境变量
/// - `RUST_LOG`：标准的 Rust 日志级别控制（如 `debug`, `info`, `warn`, `error`）
/// - `MONITOR_LOG_FILE`：日志文件路径，设置后日志输出到文件而非终端
///
/// ## 使用示例
///
/// ```bash
/// # 标准输出
/// backup-monitor summary
///
/// # 详细日志
/// backup-monitor -v schedule --day weekend
///
/// # 日志输出到文件
/// MONITOR_LOG_FILE=monitor.log backup-monitor list
/// ```
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Ok(log_file) = std::env::var("MONITOR_LOG_FILE") {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
        {
            Ok(file) => {
                // 输出到文件 - 使用详细格式便于调试
                fmt()
                    .with_env_filter(env_filter)
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .init();
                return;
            }
            Err(e) => eprintln!("无法打开日志文件 {log_file}: {e}，改为输出到终端"),
        }
    }

    // 输出到终端 - 使用简洁格式，用户友好
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false)
        .without_time()
        .compact()
        .init();
}

/// 仪表盘模式的日志初始化
///
/// 终端被界面占用，日志经非阻塞写入器写到文件。返回的 guard 必须存活到退出
pub fn setup_dashboard_logging(verbose: bool) -> WorkerGuard {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_path = std::env::var("MONITOR_LOG_FILE")
        .unwrap_or_else(|_| dashboard::LOG_FILE_NAME.to_string());
    let (writer, guard) = file_writer(Path::new(&log_path));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    guard
}

/// 非阻塞文件写入器，guard 释放时刷新缓冲
fn file_writer(log_path: &Path) -> (NonBlocking, WorkerGuard) {
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| dashboard::LOG_FILE_NAME.into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    tracing_appender::non_blocking(appender)
}

/// 启动失败时给用户的提示
pub fn startup_error_lines(err: &MonitorError, config_path: &Path) -> Vec<String> {
    match err {
        MonitorError::ConfigNotFound => vec![
            format!("❌ 配置文件 '{}' 未找到。", config_path.display()),
            "👉 请先运行 'backup-monitor init' 命令来创建配置文件。".to_string(),
        ],
        other => vec![format!("❌ 应用初始化失败: {other}")],
    }
}

/// 记录失败信息；仪表盘模式下日志只进文件，同时写到 stderr
pub fn report_failure(lines: &[String], echo_stderr: bool) {
    for line in lines {
        error!("{}", line);
        if echo_stderr {
            eprintln!("{line}");
        }
    }
}

/// 文本条形图
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let filled = (count * width).div_ceil(max).min(width);
    "█".repeat(filled)
}

/// 按字符截断，超出部分以省略号结尾
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// 页码提示，前后还有页时带箭头
pub fn page_indicator<T>(page: &Page<'_, T>) -> String {
    let previous = if page.has_previous() { "◀ " } else { "" };
    let next = if page.has_next() { " ▶" } else { "" };
    format!(
        "{previous}第 {} / {} 页{next}",
        page.current_page, page.total_pages
    )
}
