//! 订单处理上下文
//!
//! 封装"我正在处理第几个订单"这一信息

use std::fmt::Display;

/// 订单处理上下文
#[derive(Debug, Clone, Copy)]
pub struct OrderCtx {
    /// 订单号
    pub order_number: u32,

    /// 在本批中的位置（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本批订单总数
    pub total: usize,
}

impl OrderCtx {
    pub fn new(order_number: u32, index: usize, total: usize) -> Self {
        Self {
            order_number,
            index,
            total,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[订单 #{} {}/{}]", self.order_number, self.index, self.total)
    }
}
