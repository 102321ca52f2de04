//! 核心数据模型定义
//!
//! 投诉记录、产品、商家由存储层负责写入，核心只读取。
//! 信任分、意图、回复都是按请求计算的临时值，不做缓存。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 投诉处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    /// 待处理
    #[default]
    Pending,
    /// 处理中
    InProgress,
    /// 已解决
    Resolved,
}

impl ComplaintStatus {
    /// 数据库中保存的文本形式
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }

    /// 大小写不敏感地解析状态文本
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "pending" => Some(ComplaintStatus::Pending),
            "in progress" | "in_progress" | "inprogress" => Some(ComplaintStatus::InProgress),
            "resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 投诉优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 投诉记录 - 核心数据结构
///
/// 对应数据库 `users` 表的一行。状态与优先级以文本形式存储，
/// 因此这里保留原始文本，读取时不强制转换为枚举。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// 提交标识（写入时保证唯一）
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub product_id: i64,
    pub vendor_id: i64,
    /// FSSAI 许可编码
    pub fssai_code: Option<i64>,
    pub complaint_text: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub complaint_date: Option<NaiveDate>,
    /// 评分 (1-5)
    pub rating: Option<i64>,
    pub review: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub review_sentiment: Option<String>,
}

/// 新投诉提交（由提交流程构造）
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    /// 用户填写的ID，已存在时追加时间戳后缀
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub product_id: i64,
    pub vendor_id: i64,
    /// 原始输入，只有全部为数字时才保存
    pub fssai_code: Option<String>,
    pub complaint_text: String,
    pub priority: Priority,
    pub rating: i64,
    pub review: Option<String>,
}

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// 实际保存的ID
    pub id: String,
    /// ID是否因冲突被改名
    pub renamed: bool,
}

/// 投诉跟踪/商家看板中展示的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSummary {
    pub id: String,
    pub name: Option<String>,
    pub product_name: Option<String>,
    pub vendor_name: Option<String>,
    pub complaint_text: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub complaint_date: Option<NaiveDate>,
    pub rating: Option<i64>,
}

/// 首页统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuickStats {
    pub records: u64,
    pub products: u64,
    pub vendors: u64,
}

/// 产品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

/// 商家
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
}

/// 按产品名分组的投诉计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub product_name: String,
    pub total_complaints: u64,
}

/// 全局概览所需的聚合值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OverviewTotals {
    /// 投诉总数
    pub total: u64,
    /// 已解决数量（状态大小写不敏感）
    pub resolved: u64,
    /// 非空评分的平均值，没有评分时为 None
    pub avg_rating: Option<f64>,
}

impl OverviewTotals {
    /// 已解决百分比，总数为0时返回0
    pub fn resolved_percent(&self) -> f64 {
        if self.total > 0 {
            self.resolved as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// 带样本来源的数值
///
/// 区分"由 N 个样本计算得出"和"没有样本，取默认值0"。两者渲染结果相同。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sampled {
    /// 由样本计算
    Computed { value: f64, samples: usize },
    /// 无样本，默认0
    Defaulted,
}

impl Sampled {
    pub fn value(&self) -> f64 {
        match self {
            Sampled::Computed { value, .. } => *value,
            Sampled::Defaulted => 0.0,
        }
    }

    pub fn samples(&self) -> usize {
        match self {
            Sampled::Computed { samples, .. } => *samples,
            Sampled::Defaulted => 0,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Sampled::Defaulted)
    }
}

/// 商家信任分
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    /// 保留两位小数的信任分
    pub trust: f64,
    /// 平均评分 (0-5)
    pub avg_rating: Sampled,
    /// 已解决比例 (0-1)
    pub resolved_ratio: Sampled,
}

/// 查询意图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// 使用帮助
    Help,
    /// 某商家的信任分
    TrustForVendor { vendor: String },
    /// 投诉最多的产品
    TopComplaints,
    /// 某个邦/地区的投诉数
    ComplaintsInState { state: String },
    /// 某产品的投诉数
    ComplaintsForProduct { product: String },
    /// 全局概览
    Overview,
    /// 无法识别
    Unrecognized,
}

impl Intent {
    /// 意图名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Help => "help",
            Intent::TrustForVendor { .. } => "trust_for_vendor",
            Intent::TopComplaints => "top_complaints",
            Intent::ComplaintsInState { .. } => "complaints_in_state",
            Intent::ComplaintsForProduct { .. } => "complaints_for_product",
            Intent::Overview => "overview",
            Intent::Unrecognized => "unrecognized",
        }
    }
}

/// 意图解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// 规范化（小写、去空白）后的输入
    pub normalized: String,
    /// 命中的改写规则名称
    pub rewrite_rule: Option<&'static str>,
    /// 参与分类的规范查询文本
    pub canonical: String,
    pub intent: Intent,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库文件路径，未设置时使用数据目录下的默认位置
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// 聊天机器人"top complaints"返回的产品数
    #[serde(default = "default_top_complaints_limit")]
    pub top_complaints_limit: usize,
    /// 分析报表返回的产品数
    #[serde(default = "default_analytics_limit")]
    pub analytics_limit: usize,
}

fn default_top_complaints_limit() -> usize {
    5
}

fn default_analytics_limit() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            top_complaints_limit: default_top_complaints_limit(),
            analytics_limit: default_analytics_limit(),
        }
    }
}
