//! 基于 Chrome 的下单网站实现
//!
//! 通过 `JsExecutor` 操作页面；元素选择器与 RobotSpareBin 下单页一致

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::js_executor::{js_string, JsExecutor};
use crate::infrastructure::robot_site::{RobotSite, SubmitOutcome};
use crate::models::{ModelRow, OrderRecord};

const MODAL: &str = "div.modal";
const HEAD_SELECT: &str = "#head";
const LEGS_INPUT: &str = "input[placeholder='Enter the part number for the legs']";
const ADDRESS_INPUT: &str = "#address";
const PREVIEW_BUTTON: &str = "#preview";
const ORDER_BUTTON: &str = "#order";
const ERROR_ALERT: &str = "div.alert.alert-danger[role='alert']";
/// 上一次提交遗留的错误提示带有此属性
const STALE_MARK: &str = "data-stale-alert";
/// 本次点击之后出现的错误提示
const FRESH_ERROR_ALERT: &str = "div.alert.alert-danger[role='alert']:not([data-stale-alert])";
const RECEIPT: &str = "#receipt";
const ROBOT_PREVIEW: &str = "#robot-preview-image";
const MODEL_TABLE: &str = "table#model-info";

/// 打印时只保留回执区域
const RECEIPT_PRINT_STYLE: &str = "@media print { \
    body * { visibility: hidden; } \
    #receipt, #receipt * { visibility: visible; } \
    #receipt { position: absolute; left: 0; top: 0; } }";

/// Chrome 下单网站
pub struct ChromeSite {
    executor: JsExecutor,
    site_url: String,
    modal_timeout: Duration,
    element_timeout: Duration,
}

impl ChromeSite {
    pub fn new(executor: JsExecutor, config: &Config) -> Self {
        Self {
            executor,
            site_url: config.site_url.clone(),
            modal_timeout: config.modal_timeout,
            element_timeout: config.element_timeout,
        }
    }

    /// 关闭"宪法权利"弹窗，弹窗未出现只记录警告
    async fn close_annoying_modal(&self) -> AppResult<()> {
        if !self.executor.wait_for_visible(MODAL, self.modal_timeout).await? {
            warn!("弹窗未出现 (等待 {:?})", self.modal_timeout);
            return Ok(());
        }
        self.click_button_with_text("OK").await?;
        debug!("已关闭弹窗");
        Ok(())
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        let js_code = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            js_string(selector)
        );
        if self.executor.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Browser(format!("找不到元素: {}", selector)))
        }
    }

    async fn click_button_with_text(&self, text: &str) -> AppResult<()> {
        let js_code = format!(
            r#"(() => {{
                const btn = [...document.querySelectorAll('button')]
                    .find(b => b.textContent.includes({}));
                if (!btn) return false;
                btn.click();
                return true;
            }})()"#,
            js_string(text)
        );
        if self.executor.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Browser(format!("找不到按钮: {}", text)))
        }
    }

    /// React 受控组件需要通过原生 setter 赋值再触发 change
    async fn select_option(&self, selector: &str, value: &str) -> AppResult<()> {
        let js_code = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el || ![...el.options].some(o => o.value === {value})) return false;
                const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
                setter.call(el, {value});
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            js_string(selector),
            value = js_string(value)
        );
        if self.executor.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::Browser(format!("{} 中没有选项 {}", selector, value)))
        }
    }

    async fn type_into(&self, selector: &str, text: &str) -> AppResult<()> {
        self.executor
            .page()
            .find_element(selector)
            .await?
            .click()
            .await?
            .type_str(text)
            .await?;
        Ok(())
    }

    /// 等待预览图中的所有图片加载完成
    async fn wait_preview_loaded(&self) -> AppResult<bool> {
        let js_code = format!(
            r#"(() => {{
                const imgs = [...document.querySelectorAll({} + ' img')];
                return imgs.length > 0 && imgs.every(i => i.complete && i.naturalWidth > 0);
            }})()"#,
            js_string(ROBOT_PREVIEW)
        );
        let deadline = Instant::now() + self.element_timeout;
        loop {
            if self.executor.eval_as::<bool>(js_code.as_str()).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(Duration::from_millis(100)).await;
        }
    }

    async fn alert_text(&self) -> AppResult<String> {
        let js_code = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.textContent.trim() : ''; }})()",
            js_string(FRESH_ERROR_ALERT)
        );
        self.executor.eval_as(js_code).await
    }
}

#[async_trait]
impl RobotSite for ChromeSite {
    async fn open_order_page(&mut self) -> AppResult<()> {
        let page = self.executor.page();
        page.goto(self.site_url.as_str())
            .await
            .map_err(|e| AppError::Browser(format!("导航到 {} 失败: {}", self.site_url, e)))?;
        // 哈希路由下 goto 不会刷新页面，reload 保证表单是新的
        page.reload().await?;

        self.close_annoying_modal().await?;

        if !self.executor.wait_for_visible(HEAD_SELECT, self.element_timeout).await? {
            return Err(AppError::Browser("下单表单未加载".to_string()));
        }
        Ok(())
    }

    async fn read_model_table(&mut self) -> AppResult<Vec<ModelRow>> {
        self.click_button_with_text("Show model info")
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        if !self.executor.wait_for_visible(MODEL_TABLE, self.element_timeout).await? {
            return Err(AppError::CatalogUnavailable(format!("{} 未出现", MODEL_TABLE)));
        }

        let js_code = format!(
            r#"(() => {{
                const table = document.querySelector({});
                const headers = [...table.querySelectorAll('th')].map(th => th.textContent.trim());
                const nameIdx = headers.indexOf('Model name');
                const partIdx = headers.indexOf('Part number');
                if (nameIdx < 0 || partIdx < 0) return null;
                return [...table.querySelectorAll('tr')]
                    .map(tr => [...tr.querySelectorAll('td')].map(td => td.textContent.trim()))
                    .filter(cells => cells.length > Math.max(nameIdx, partIdx))
                    .map(cells => ({{ name: cells[nameIdx], part: cells[partIdx] }}));
            }})()"#,
            js_string(MODEL_TABLE)
        );

        let rows: Option<Vec<ModelRow>> = self
            .executor
            .eval_as(js_code)
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;
        rows.ok_or_else(|| AppError::CatalogUnavailable("目录表缺少 Model name / Part number 列".to_string()))
    }

    async fn fill_order_form(&mut self, order: &OrderRecord) -> AppResult<()> {
        self.select_option(HEAD_SELECT, &order.head.to_string()).await?;
        self.click(&format!("input[type='radio'][name='body'][id='id-body-{}']", order.body))
            .await?;
        self.type_into(LEGS_INPUT, &order.legs.to_string()).await?;
        self.type_into(ADDRESS_INPUT, &order.address).await?;
        Ok(())
    }

    async fn preview_robot(&mut self) -> AppResult<()> {
        self.click(PREVIEW_BUTTON).await?;
        if !self.executor.wait_for_visible(ROBOT_PREVIEW, self.element_timeout).await? {
            return Err(AppError::Browser("机器人预览未显示".to_string()));
        }
        Ok(())
    }

    async fn submit_order(&mut self) -> AppResult<SubmitOutcome> {
        self.executor.eval(mark_stale_alerts_js()).await?;
        self.click(ORDER_BUTTON).await?;

        match self
            .executor
            .wait_for_any(&[FRESH_ERROR_ALERT, RECEIPT], self.element_timeout)
            .await?
        {
            Some(0) => Ok(SubmitOutcome::Rejected(self.alert_text().await?)),
            Some(_) => Ok(SubmitOutcome::Accepted),
            None => Ok(SubmitOutcome::Rejected("提交后页面无响应".to_string())),
        }
    }

    async fn capture_preview_png(&mut self) -> AppResult<Vec<u8>> {
        if !self.executor.is_visible(ROBOT_PREVIEW).await? {
            return Err(AppError::Export(format!("确认页缺少 {}", ROBOT_PREVIEW)));
        }
        if !self.wait_preview_loaded().await? {
            warn!("预览图片未全部加载，仍然截图");
        }

        let element = self
            .executor
            .page()
            .find_element(ROBOT_PREVIEW)
            .await
            .map_err(|e| AppError::Export(e.to_string()))?;
        let png = element
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(|e| AppError::Export(format!("截图失败: {}", e)))?;
        Ok(png)
    }

    async fn print_receipt_pdf(&mut self) -> AppResult<Vec<u8>> {
        if !self.executor.is_visible(RECEIPT).await? {
            return Err(AppError::Export(format!("确认页缺少 {}", RECEIPT)));
        }

        let js_code = format!(
            r#"(() => {{
                if (!document.getElementById('receipt-print-style')) {{
                    const style = document.createElement('style');
                    style.id = 'receipt-print-style';
                    style.textContent = {};
                    document.head.appendChild(style);
                }}
                return true;
            }})()"#,
            js_string(RECEIPT_PRINT_STYLE)
        );
        self.executor.eval(js_code).await?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        let pdf = self
            .executor
            .page()
            .pdf(params)
            .await
            .map_err(|e| AppError::Export(format!("打印回执失败: {}", e)))?;
        Ok(pdf)
    }
}

/// 标记当前所有错误提示，重试时不把旧提示当作本次结果
fn mark_stale_alerts_js() -> String {
    format!(
        "(() => {{ document.querySelectorAll({}).forEach(el => el.setAttribute({}, '1')); return true; }})()",
        js_string(ERROR_ALERT),
        js_string(STALE_MARK)
    )
}
