//! 持久层网关接口
//!
//! 核心只通过此 trait 读取投诉、产品和商家数据。
//! 连接的生命周期由调用方负责，测试中可以替换为假实现。

use crate::core::error::GatewayError;
use crate::core::models::{OverviewTotals, ProductCount};

/// 只读聚合查询网关
///
/// 所有名称片段匹配均为大小写不敏感的子串匹配。
pub trait ComplaintGateway {
    /// 商家所有非空评分
    fn vendor_ratings(&self, vendor_id: i64) -> Result<Vec<i64>, GatewayError>;

    /// 商家所有非空状态文本
    fn vendor_statuses(&self, vendor_id: i64) -> Result<Vec<String>, GatewayError>;

    /// 按名称片段查找商家，只返回第一个匹配
    fn find_vendor(&self, name_fragment: &str) -> Result<Option<i64>, GatewayError>;

    /// 按产品名分组的投诉数，降序，最多 `limit` 条
    fn top_products(&self, limit: usize) -> Result<Vec<ProductCount>, GatewayError>;

    /// 地区字段包含片段的投诉数
    fn count_in_state(&self, state_fragment: &str) -> Result<u64, GatewayError>;

    /// 产品名包含片段的投诉数（按产品名分组）
    fn product_counts(&self, name_fragment: &str) -> Result<Vec<ProductCount>, GatewayError>;

    /// 全局概览聚合
    fn overview_totals(&self) -> Result<OverviewTotals, GatewayError>;
}

impl<G: ComplaintGateway + ?Sized> ComplaintGateway for &G {
    fn vendor_ratings(&self, vendor_id: i64) -> Result<Vec<i64>, GatewayError> {
        (**self).vendor_ratings(vendor_id)
    }

    fn vendor_statuses(&self, vendor_id: i64) -> Result<Vec<String>, GatewayError> {
        (**self).vendor_statuses(vendor_id)
    }

    fn find_vendor(&self, name_fragment: &str) -> Result<Option<i64>, GatewayError> {
        (**self).find_vendor(name_fragment)
    }

    fn top_products(&self, limit: usize) -> Result<Vec<ProductCount>, GatewayError> {
        (**self).top_products(limit)
    }

    fn count_in_state(&self, state_fragment: &str) -> Result<u64, GatewayError> {
        (**self).count_in_state(state_fragment)
    }

    fn product_counts(&self, name_fragment: &str) -> Result<Vec<ProductCount>, GatewayError> {
        (**self).product_counts(name_fragment)
    }

    fn overview_totals(&self) -> Result<OverviewTotals, GatewayError> {
        (**self).overview_totals()
    }
}
