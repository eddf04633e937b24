use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::order::OrderRecord;

/// 从 CSV 内容解析订单记录，保持行顺序
///
/// 表头：`Order number,Head,Body,Legs,Address`
pub fn parse_orders<R: Read>(reader: R) -> AppResult<Vec<OrderRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut orders = Vec::new();
    let mut seen = HashSet::new();

    for record in csv_reader.deserialize::<OrderRecord>() {
        let order = record?;
        if !seen.insert(order.order_number) {
            return Err(AppError::Parse {
                row: orders.len() + 2,
                message: format!("订单号重复: {}", order.order_number),
            });
        }
        orders.push(order);
    }

    debug!("解析到 {} 条订单", orders.len());
    Ok(orders)
}

/// 从 CSV 文件加载订单记录
pub async fn load_orders_from_file(csv_path: &Path) -> AppResult<Vec<OrderRecord>> {
    let content = fs::read(csv_path)
        .await
        .map_err(|e| AppError::io_at(csv_path, e))?;
    parse_orders(content.as_slice())
}
