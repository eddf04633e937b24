//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用生命周期
//! - 初始化日志、启动/连接浏览器
//! - 下载订单 CSV
//! - 输出全局统计信息
//!
//! ### `order_processor` - 订单批处理
//! - 读取车型目录（一次）
//! - 按 CSV 顺序逐个执行 `OrderFlow`
//! - 记录失败订单，最后归档
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App：浏览器 + 下载)
//!     ↓
//! order_processor (处理 Vec<OrderRecord>)
//!     ↓
//! workflow::OrderFlow (处理单个订单)
//!     ↓
//! services (能力层：表单 / 导出 / 合成 / 归档)
//!     ↓
//! infrastructure (基础设施：RobotSite / JsExecutor)
//! ```

pub mod batch_processor;
pub mod order_processor;

pub use batch_processor::App;
pub use order_processor::{process_orders, run_pipeline, BatchReport};
