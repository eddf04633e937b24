//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use std::fs;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// 初始化 tracing，`RUST_LOG` 优先，否则按 verbose 选择级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件（写入带时间的标题）
pub fn init_log_file(log_file_path: &Path) -> AppResult<()> {
    let log_header = format!(
        "{}\n机器人订单处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::io_at(log_file_path, e))
}

/// 在日志文件末尾追加运行统计
pub fn append_summary(log_file_path: &Path, summary: &str) -> AppResult<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::io_at(log_file_path, e))?;
    writeln!(file, "{}", summary).map_err(|e| AppError::io_at(log_file_path, e))
}

/// 记录程序启动信息
pub fn log_startup(site_url: &str, max_attempts: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单自动化");
    info!("🌐 下单页面: {}", site_url);
    info!("🔁 每单最多提交: {} 次", max_attempts);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, archive: &Path, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📦 压缩包: {}", archive.display());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}
