//! 订单来源 - 业务能力层
//!
//! 下载订单 CSV 并解析为订单记录

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{load_orders_from_file, OrderRecord};

/// 订单来源
pub struct OrderSource {
    client: reqwest::Client,
    url: String,
}

impl OrderSource {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::download_failed(url.clone(), e))?;
        Ok(Self { client, url })
    }

    /// 下载 CSV 到 `save_to`，再从该文件读取订单
    pub async fn fetch(&self, save_to: &Path) -> AppResult<Vec<OrderRecord>> {
        info!("📥 正在下载订单文件: {}", self.url);

        let bytes = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AppError::download_failed(self.url.clone(), e))?
            .bytes()
            .await
            .map_err(|e| AppError::download_failed(self.url.clone(), e))?;
        debug!("下载完成: {} 字节", bytes.len());

        if let Some(parent) = save_to.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::io_at(parent, e))?;
        }
        tokio::fs::write(save_to, &bytes)
            .await
            .map_err(|e| AppError::io_at(save_to, e))?;

        let orders = load_orders_from_file(save_to).await?;
        info!("✓ 读取到 {} 条订单", orders.len());
        Ok(orders)
    }
}
