//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、启动或连接浏览器
//! 2. **下载订单**：订单 CSV → `Vec<OrderRecord>`
//! 3. **委托处理**：交给 `order_processor` 顺序处理并归档
//! 4. **全局统计**：汇总成功 / 失败订单

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromeSite, JsExecutor};
use crate::models::OutputLayout;
use crate::orchestrator::order_processor::{self, BatchReport};
use crate::services::OrderSource;
use crate::utils::logging;
use crate::workflow::OrderState;

/// 应用主结构
pub struct App {
    config: Config,
    layout: OutputLayout,
    _browser: Browser,
    site: ChromeSite,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let layout = OutputLayout::new(&config.output_dir);
        layout.ensure_dirs()?;
        logging::init_log_file(&layout.root().join(&config.output_log_file))?;

        logging::log_startup(&config.site_url, config.max_submission_attempts);

        let (browser, page) = browser::open_session(&config).await?;
        let site = ChromeSite::new(JsExecutor::new(page), &config);

        Ok(Self {
            config,
            layout,
            _browser: browser,
            site,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<BatchReport> {
        let orders = OrderSource::new(self.config.orders_csv_url.clone())?
            .fetch(&self.layout.orders_csv())
            .await?;

        if orders.is_empty() {
            warn!("⚠️ 订单文件中没有订单");
        }

        let report = order_processor::run_pipeline(&mut self.site, &orders, &self.config, &self.layout).await?;

        self.print_report(&report);
        Ok(report)
    }

    fn print_report(&self, report: &BatchReport) {
        for outcome in report.failed() {
            if let OrderState::Failed { stage, reason } = &outcome.state {
                error!("订单 #{} 失败 ({}): {}", outcome.order_number, stage, reason);
            }
        }

        let success = report.succeeded().count();
        let failed = report.failed().count();
        let log_file = self.layout.root().join(&self.config.output_log_file);

        let summary = format!(
            "成功: {}/{}\n失败: {}\n压缩包: {}\n失败记录: {}",
            success,
            report.total(),
            failed,
            report.archive.archive.display(),
            self.layout.failure_log().display()
        );
        if let Err(e) = logging::append_summary(&log_file, &summary) {
            warn!("⚠️ 无法写入日志文件: {}", e);
        }

        logging::print_final_stats(success, failed, report.total(), &report.archive.archive, &log_file);
        if failed > 0 {
            info!("失败订单详见: {}", self.layout.failure_log().display());
        }
    }
}
