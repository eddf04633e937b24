//! 下单网站能力接口
//!
//! 业务层只依赖这个接口，真实实现见 `ChromeSite`，测试中可替换为内存实现

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{ModelRow, OrderRecord};

/// 一次点击"下单"后的页面结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 回执已显示
    Accepted,
    /// 页面出现错误提示（或无响应），附带原因
    Rejected(String),
}

/// 下单网站
///
/// 同一个会话在所有订单间复用，每个订单开始时调用 `open_order_page` 重置状态
#[async_trait]
pub trait RobotSite: Send {
    /// 导航到下单页并关闭弹窗，可重复调用
    async fn open_order_page(&mut self) -> AppResult<()>;

    /// 展开并读取车型目录表
    async fn read_model_table(&mut self) -> AppResult<Vec<ModelRow>>;

    /// 按订单填写表单
    async fn fill_order_form(&mut self, order: &OrderRecord) -> AppResult<()>;

    /// 点击预览，渲染机器人图片
    async fn preview_robot(&mut self) -> AppResult<()>;

    /// 点击下单一次
    async fn submit_order(&mut self) -> AppResult<SubmitOutcome>;

    /// 截取机器人预览图（PNG）
    async fn capture_preview_png(&mut self) -> AppResult<Vec<u8>>;

    /// 将确认页的回执打印为 PDF
    async fn print_receipt_pdf(&mut self) -> AppResult<Vec<u8>>;
}
