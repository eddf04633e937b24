//! # Robot Order Bot
//!
//! 自动化 RobotSpareBin 机器人下单：下载订单 CSV，逐个填写并提交下单表单，
//! 保存回执 PDF 与机器人预览截图，把截图嵌入回执，最后打包为 zip。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `RobotSite` - 下单网站能力接口，`ChromeSite` 为浏览器实现
//!
//! ### ② 业务能力层（Services）
//! - `OrderSource` - 下载并解析订单 CSV
//! - `resolve_catalog` - 读取车型目录
//! - `FormDriver` - 填表与有限次数重试提交
//! - `ReceiptExporter` / `embed_screenshot_to_receipt` - 回执导出与合成
//! - `Archiver` - 打包 zip
//! - `FailureLog` - 写 failed_orders.txt
//!
//! ### ③ 流程层（Workflow）
//! - `OrderCtx` - 上下文封装（订单号 + 位置）
//! - `OrderFlow` - 单个订单流程（填表 → 提交 → 导出 → 合成）
//! - `OrderState` - 单个订单的状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用生命周期，持有浏览器
//! - `orchestrator/order_processor` - 顺序处理所有订单并归档

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, MissingReceiptPolicy};
pub use error::{AppError, AppResult};
pub use infrastructure::{ChromeSite, JsExecutor, RobotSite, SubmitOutcome};
pub use models::{Catalog, ModelRow, OrderRecord, OutputLayout};
pub use orchestrator::{process_orders, run_pipeline, App, BatchReport};
pub use workflow::{FailedStage, OrderCtx, OrderFlow, OrderOutcome, OrderState};
