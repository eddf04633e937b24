//! 车型目录解析 - 业务能力层

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::RobotSite;
use crate::models::Catalog;

/// 读取下单页的车型信息表，构建零件编号 → 车型名称映射
pub async fn resolve_catalog(site: &mut dyn RobotSite) -> AppResult<Catalog> {
    info!("📖 正在读取车型目录...");

    site.open_order_page()
        .await
        .map_err(|e| AppError::CatalogUnavailable(format!("无法打开下单页: {}", e)))?;
    let rows = site.read_model_table().await?;
    debug!("目录表共 {} 行", rows.len());

    let catalog = Catalog::from_rows(&rows)?;
    info!("✓ 车型目录包含 {} 个零件", catalog.len());
    Ok(catalog)
}
