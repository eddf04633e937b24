//! 订单批处理器 - 编排层
//!
//! 按 CSV 顺序逐个处理订单，最后统一归档

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::RobotSite;
use crate::models::{Catalog, OrderRecord, OutputLayout};
use crate::services::{resolve_catalog, ArchiveReport, Archiver, FailureLog, FormDriver};
use crate::workflow::{FailedStage, OrderCtx, OrderFlow, OrderOutcome, OrderState};

/// 一次运行的结果
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 每个订单的结果，保持 CSV 顺序
    pub outcomes: Vec<OrderOutcome>,
    pub archive: ArchiveReport,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &OrderOutcome> {
        self.outcomes.iter().filter(|o| !o.state.is_failed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &OrderOutcome> {
        self.outcomes.iter().filter(|o| o.state.is_failed())
    }
}

/// 完整流程：准备目录 → 读取目录表 → 处理订单 → 归档
///
/// 目录表不可用时在处理任何订单之前返回错误
pub async fn run_pipeline(
    site: &mut dyn RobotSite,
    orders: &[OrderRecord],
    config: &Config,
    layout: &OutputLayout,
) -> AppResult<BatchReport> {
    layout.ensure_dirs()?;
    let failure_log = FailureLog::new(layout.failure_log());
    failure_log.reset()?;

    let catalog = resolve_catalog(site).await?;
    process_orders(site, orders, &catalog, config, layout, &failure_log).await
}

/// 逐个处理订单，失败的订单不影响后续订单
pub async fn process_orders(
    site: &mut dyn RobotSite,
    orders: &[OrderRecord],
    catalog: &Catalog,
    config: &Config,
    layout: &OutputLayout,
    failure_log: &FailureLog,
) -> AppResult<BatchReport> {
    let flow = OrderFlow::new(FormDriver::from_config(config), layout.clone());
    let total = orders.len();
    let mut outcomes = Vec::with_capacity(total);

    for (idx, order) in orders.iter().enumerate() {
        let ctx = OrderCtx::new(order.order_number, idx + 1, total);
        info!("\n{} 开始处理", ctx);

        let outcome = flow.run(site, order, catalog, &ctx).await;
        if let OrderState::Failed { stage, reason } = &outcome.state {
            record_failure(failure_log, outcome.order_number, *stage, reason);
        }
        outcomes.push(outcome);
    }

    // ========== 归档 ==========
    let files: Vec<PathBuf> = outcomes.iter().filter_map(|o| o.merged_pdf.clone()).collect();
    let archive = Archiver::new(config.missing_receipt_policy).archive(&files, &layout.archive())?;

    for outcome in outcomes.iter_mut().filter(|o| o.state == OrderState::Composed) {
        let missing = outcome
            .merged_pdf
            .as_ref()
            .map(|p| archive.skipped.contains(p))
            .unwrap_or(true);
        if missing {
            let reason = "归档时合成回执缺失".to_string();
            record_failure(failure_log, outcome.order_number, FailedStage::Composition, &reason);
            outcome.advance(OrderState::Failed {
                stage: FailedStage::Composition,
                reason,
            });
        } else {
            outcome.advance(OrderState::Archived);
        }
    }

    Ok(BatchReport { outcomes, archive })
}

fn record_failure(failure_log: &FailureLog, order_number: u32, stage: FailedStage, reason: &str) {
    if let Err(e) = failure_log.record(order_number, &stage.to_string(), reason) {
        warn!("⚠️ 无法写入失败记录 {}: {}", failure_log.path().display(), e);
    }
}
