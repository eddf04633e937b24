//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 打开下单页 → 填表 → 预览
//! 2. 提交（有限次重试）
//! 3. 截图 + 打印回执
//! 4. 截图嵌入回执

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::error::AppError;
use crate::infrastructure::RobotSite;
use crate::models::{Catalog, OrderRecord, OutputLayout};
use crate::services::{embed_screenshot_to_receipt, ExportedReceipt, FormDriver, ReceiptExporter};
use crate::workflow::order_ctx::OrderCtx;
use crate::workflow::order_state::{FailedStage, OrderState};

/// 单个订单的处理结果
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub order_number: u32,
    pub state: OrderState,
    /// 提交尝试次数（未提交为 0）
    pub attempts: usize,
    /// 导出的回执与截图
    pub exported: Option<ExportedReceipt>,
    /// 合成后的回执
    pub merged_pdf: Option<PathBuf>,
}

impl OrderOutcome {
    fn pending(order_number: u32) -> Self {
        Self {
            order_number,
            state: OrderState::Pending,
            attempts: 0,
            exported: None,
            merged_pdf: None,
        }
    }

    /// 进入下一个状态
    pub fn advance(&mut self, next: OrderState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "非法状态转换: {:?} → {:?}",
            self.state,
            next
        );
        debug!("订单 #{} 状态: {:?} → {:?}", self.order_number, self.state, next);
        self.state = next;
    }

    fn fail(mut self, stage: FailedStage, err: &AppError) -> Self {
        self.advance(OrderState::Failed {
            stage,
            reason: err.to_string(),
        });
        self
    }
}

/// 订单处理流程
///
/// - 编排单个订单的完整处理流程
/// - 不持有浏览器，会话由调用方传入
/// - 错误不向上传播，转成 Failed 状态
pub struct OrderFlow {
    form_driver: FormDriver,
    exporter: ReceiptExporter,
    layout: OutputLayout,
}

impl OrderFlow {
    pub fn new(form_driver: FormDriver, layout: OutputLayout) -> Self {
        Self {
            form_driver,
            exporter: ReceiptExporter::new(layout.clone()),
            layout,
        }
    }

    pub async fn run(
        &self,
        site: &mut dyn RobotSite,
        order: &OrderRecord,
        catalog: &Catalog,
        ctx: &OrderCtx,
    ) -> OrderOutcome {
        let mut outcome = OrderOutcome::pending(order.order_number);

        // ========== 1. 填表 ==========
        if let Err(e) = self.form_driver.fill(site, order, catalog, ctx).await {
            error!("{} ❌ 填写表单失败: {}", ctx, e);
            return outcome.fail(FailedStage::Submission, &e);
        }
        outcome.advance(OrderState::FormFilled);

        // ========== 2. 提交 ==========
        match self.form_driver.submit_until_success(site, ctx).await {
            Ok(attempts) => {
                outcome.attempts = attempts;
                outcome.advance(OrderState::Submitted { attempts });
                outcome.advance(OrderState::Succeeded);
            }
            Err(e) => {
                let attempts = self.form_driver.max_attempts();
                outcome.attempts = attempts;
                outcome.advance(OrderState::Submitted { attempts });
                error!("{} ❌ {}", ctx, e);
                return outcome.fail(FailedStage::Submission, &e);
            }
        }

        // ========== 3. 导出 ==========
        let exported = match self.exporter.export(site, order.order_number).await {
            Ok(exported) => exported,
            Err(e) => {
                error!("{} ❌ 导出回执失败: {}", ctx, e);
                return outcome.fail(FailedStage::Export, &e);
            }
        };
        outcome.exported = Some(exported.clone());
        outcome.advance(OrderState::Exported);

        // ========== 4. 合成 ==========
        let merged_pdf = self.layout.merged_pdf(order.order_number);
        if let Err(e) = embed_screenshot_to_receipt(&exported.receipt_pdf, &exported.preview_image, &merged_pdf) {
            error!("{} ❌ 合成回执失败: {}", ctx, e);
            return outcome.fail(FailedStage::Composition, &e);
        }
        outcome.merged_pdf = Some(merged_pdf);
        outcome.advance(OrderState::Composed);

        info!("{} ✅ 订单完成", ctx);
        outcome
    }
}
