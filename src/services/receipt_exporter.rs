//! 回执导出 - 业务能力层
//!
//! 把确认页的回执打印为 PDF，并截取机器人预览图

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::RobotSite;
use crate::models::OutputLayout;

/// 一个订单导出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReceipt {
    pub receipt_pdf: PathBuf,
    pub preview_image: PathBuf,
}

/// 回执导出
pub struct ReceiptExporter {
    layout: OutputLayout,
}

impl ReceiptExporter {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// 导出回执 PDF 与预览截图
    ///
    /// 先截图再打印，打印会给页面注入打印样式
    pub async fn export(&self, site: &mut dyn RobotSite, order_number: u32) -> AppResult<ExportedReceipt> {
        let png = site.capture_preview_png().await?;
        let pdf = site.print_receipt_pdf().await?;

        let preview_image = self.layout.preview_image(order_number);
        let receipt_pdf = self.layout.receipt_pdf(order_number);
        write_artifact(&preview_image, &png).await?;
        write_artifact(&receipt_pdf, &pdf).await?;
        debug!(
            "订单 {} 已导出: {} / {}",
            order_number,
            receipt_pdf.display(),
            preview_image.display()
        );

        Ok(ExportedReceipt {
            receipt_pdf,
            preview_image,
        })
    }
}

async fn write_artifact(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if bytes.is_empty() {
        return Err(AppError::Export(format!("{} 内容为空", path.display())));
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Export(format!("无法创建目录 {}: {}", parent.display(), e)))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::Export(format!("无法写入 {}: {}", path.display(), e)))
}
