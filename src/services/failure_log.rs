//! 失败订单记录 - 业务能力层
//!
//! 只负责"写 failed_orders.txt"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult};

/// 失败订单记录
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 清空上一次运行留下的记录
    pub fn reset(&self) -> AppResult<()> {
        std::fs::write(&self.path, "").map_err(|e| AppError::io_at(&self.path, e))
    }

    /// 追加一条失败记录
    pub fn record(&self, order_number: u32, stage: &str, reason: &str) -> AppResult<()> {
        debug!("写入失败记录: 订单 {} | {}", order_number, stage);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io_at(&self.path, e))?;

        let line = format!(
            "{} | 订单 {} | 阶段: {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            order_number,
            stage,
            reason.replace('\n', " ")
        );
        file.write_all(line.as_bytes())
            .map_err(|e| AppError::io_at(&self.path, e))
    }
}
