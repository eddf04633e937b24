//! 订单记录

use serde::Deserialize;

/// 订单记录，对应订单 CSV 中的一行
///
/// 读取后不可变，只在提交表单时使用一次
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRecord {
    /// 订单号（批次内唯一）
    #[serde(rename = "Order number")]
    pub order_number: u32,
    /// 头部零件编号
    #[serde(rename = "Head")]
    pub head: u32,
    /// 身体零件编号
    #[serde(rename = "Body")]
    pub body: u32,
    /// 腿部零件编号
    #[serde(rename = "Legs")]
    pub legs: u32,
    /// 收货地址
    #[serde(rename = "Address")]
    pub address: String,
}
