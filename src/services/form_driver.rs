//! 表单驱动 - 业务能力层
//!
//! 只负责"填写并提交一个订单"，带有限次数重试

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{RobotSite, SubmitOutcome};
use crate::models::{Catalog, OrderRecord};
use crate::workflow::OrderCtx;

/// 表单驱动
pub struct FormDriver {
    max_attempts: usize,
    retry_delay: Duration,
}

impl FormDriver {
    pub fn new(max_attempts: usize, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_submission_attempts, config.submission_retry_delay)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// 重新打开下单页并填写表单，点击预览
    pub async fn fill(
        &self,
        site: &mut dyn RobotSite,
        order: &OrderRecord,
        catalog: &Catalog,
        ctx: &OrderCtx,
    ) -> AppResult<()> {
        let head_name = catalog.name_of(order.head).ok_or_else(|| AppError::Submission {
            order_number: order.order_number,
            attempts: 0,
            reason: format!("目录中没有头部零件 {}", order.head),
        })?;
        info!(
            "{} 头部: {} ({}), 身体: {}, 腿部: {}",
            ctx, head_name, order.head, order.body, order.legs
        );

        let not_submitted = |e: AppError| AppError::Submission {
            order_number: order.order_number,
            attempts: 0,
            reason: e.to_string(),
        };
        site.open_order_page().await.map_err(not_submitted)?;
        site.fill_order_form(order).await.map_err(not_submitted)?;
        site.preview_robot().await.map_err(not_submitted)?;
        debug!("{} 表单已填写", ctx);
        Ok(())
    }

    /// 提交直到成功或用尽次数，返回实际尝试次数
    pub async fn submit_until_success(&self, site: &mut dyn RobotSite, ctx: &OrderCtx) -> AppResult<usize> {
        let mut last_reason = String::new();

        for attempt in 1..=self.max_attempts {
            match site.submit_order().await {
                Ok(SubmitOutcome::Accepted) => {
                    info!("{} ✓ 第 {} 次提交成功", ctx, attempt);
                    return Ok(attempt);
                }
                Ok(SubmitOutcome::Rejected(reason)) => {
                    warn!(
                        "{} ⚠️ 提交失败 (尝试 {}/{}): {}",
                        ctx, attempt, self.max_attempts, reason
                    );
                    last_reason = reason;
                }
                Err(e) => {
                    warn!(
                        "{} ⚠️ 提交出错 (尝试 {}/{}): {}",
                        ctx, attempt, self.max_attempts, e
                    );
                    last_reason = e.to_string();
                }
            }

            if attempt < self.max_attempts && !self.retry_delay.is_zero() {
                sleep(self.retry_delay).await;
            }
        }

        Err(AppError::Submission {
            order_number: ctx.order_number,
            attempts: self.max_attempts,
            reason: last_reason,
        })
    }
}
