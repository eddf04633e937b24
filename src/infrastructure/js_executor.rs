//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS / 等待元素"的能力

use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AppResult;

/// 轮询页面状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识订单 / 回执
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 选择器对应的元素是否存在且可见
    pub async fn is_visible(&self, selector: &str) -> AppResult<bool> {
        let js_code = format!(
            r#"(() => {{
                const el = document.querySelector({});
                return !!el && el.getClientRects().length > 0;
            }})()"#,
            js_string(selector)
        );
        self.eval_as(js_code).await
    }

    /// 等待元素可见，超时返回 false
    pub async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> AppResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!("等待元素超时: {}", selector);
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 等待多个选择器中任意一个可见，返回其下标
    pub async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> AppResult<Option<usize>> {
        let deadline = Instant::now() + timeout;
        loop {
            for (index, selector) in selectors.iter().enumerate() {
                if self.is_visible(selector).await? {
                    return Ok(Some(index));
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

/// 将字符串转成 JS 字面量
pub fn js_string(value: &str) -> String {
    JsonValue::String(value.to_string()).to_string()
}
