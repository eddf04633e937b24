//! 输出目录布局

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// 压缩包文件名
pub const ARCHIVE_FILE_NAME: &str = "robot_orders_receipts.zip";

/// 输出目录布局
///
/// ```text
/// <root>/orders.csv
/// <root>/receipts/receipt_{n}.pdf
/// <root>/images/screenshot_{n}.png
/// <root>/pdfs/receipt_with_screenshot_{n}.pdf
/// <root>/robot_orders_receipts.zip
/// <root>/failed_orders.txt
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 创建所有子目录
    pub fn ensure_dirs(&self) -> AppResult<()> {
        for dir in [self.receipts_dir(), self.images_dir(), self.pdfs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| AppError::io_at(&dir, e))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn orders_csv(&self) -> PathBuf {
        self.root.join("orders.csv")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.root.join("receipts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn pdfs_dir(&self) -> PathBuf {
        self.root.join("pdfs")
    }

    pub fn receipt_pdf(&self, order_number: u32) -> PathBuf {
        self.receipts_dir().join(format!("receipt_{}.pdf", order_number))
    }

    pub fn preview_image(&self, order_number: u32) -> PathBuf {
        self.images_dir().join(format!("screenshot_{}.png", order_number))
    }

    pub fn merged_pdf(&self, order_number: u32) -> PathBuf {
        self.pdfs_dir()
            .join(format!("receipt_with_screenshot_{}.pdf", order_number))
    }

    pub fn archive(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE_NAME)
    }

    pub fn failure_log(&self) -> PathBuf {
        self.root.join("failed_orders.txt")
    }
}
