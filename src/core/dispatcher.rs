//! 查询分发模块
//!
//! 把解析出的意图映射为网关查询，并渲染为可读的回复。
//! "未找到"与"无法识别"作为回复返回；网关失败原样传播。

use crate::core::error::GatewayError;
use crate::core::gateway::ComplaintGateway;
use crate::core::intent::IntentResolver;
use crate::core::models::{Intent, ProductCount};
use crate::core::trust::{compute_vendor_trust, round2};

/// 帮助文本
pub const HELP_TEXT: &str =
    "Try: trust vendor Nestle | top complaints | complaints in Delhi | complaints for Maggi | overview";

/// 快捷问题（英文 + 印地语）
pub const QUICK_QUESTIONS: [&str; 6] = [
    "top complaints",
    "Delhi me complaints kitne hain",
    "Nestle vendor ka trust kya hai",
    "Maggi product ke complaints",
    "overview",
    "help",
];

/// 聊天机器人"top complaints"默认返回的产品数
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// 表格回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 由产品计数构建表格
    pub fn from_product_counts(counts: &[ProductCount]) -> Self {
        Self {
            headers: vec!["product_name".to_string(), "total_complaints".to_string()],
            rows: counts
                .iter()
                .map(|c| vec![c.product_name.clone(), c.total_complaints.to_string()])
                .collect(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        writeln!(f, "{}", render(&self.headers))?;
        write!(
            f,
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
        )?;
        for row in &self.rows {
            write!(f, "\n{}", render(row))?;
        }
        Ok(())
    }
}

/// 聊天机器人回复
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 普通文本回答
    Text(String),
    /// 表格回答
    Table { title: String, table: Table },
    /// 引用的商家/产品未匹配到任何记录
    NotFound(String),
    /// 没有可统计的数据
    NoData,
    /// 无法识别，引导用户使用帮助
    Guidance(String),
}

impl Reply {
    /// 是否为"未找到"类回复
    pub fn is_not_found(&self) -> bool {
        matches!(self, Reply::NotFound(_))
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Table { title, table } => write!(f, "{}\n{}", title, table),
            Reply::NotFound(message) => write!(f, "{}", message),
            Reply::NoData => write!(f, "No data"),
            Reply::Guidance(message) => write!(f, "{}", message),
        }
    }
}

/// 查询分发器
///
/// 网关由调用方构造并注入，分发器不持有全局连接。
pub struct QueryDispatcher<G> {
    gateway: G,
    resolver: IntentResolver,
    top_limit: usize,
}

impl<G: ComplaintGateway> QueryDispatcher<G> {
    /// 创建分发器
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            resolver: IntentResolver::new(),
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    /// 设置"top complaints"返回的产品数
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// 解析并回答一个自由文本问题
    pub fn ask(&self, text: &str) -> Result<Reply, GatewayError> {
        let resolution = self.resolver.resolve(text);
        self.dispatch(&resolution.intent)
    }

    /// 执行意图对应的查询
    pub fn dispatch(&self, intent: &Intent) -> Result<Reply, GatewayError> {
        tracing::debug!(intent = intent.name(), "分发查询");

        match intent {
            Intent::Help => Ok(Reply::Text(HELP_TEXT.to_string())),
            Intent::TrustForVendor { vendor } => self.trust_for_vendor(vendor),
            Intent::TopComplaints => self.top_complaints(),
            Intent::ComplaintsInState { state } => self.complaints_in_state(state),
            Intent::ComplaintsForProduct { product } => self.complaints_for_product(product),
            Intent::Overview => self.overview(),
            Intent::Unrecognized => Ok(Reply::Guidance("Not understood. Type `help`.".to_string())),
        }
    }

    fn trust_for_vendor(&self, vendor: &str) -> Result<Reply, GatewayError> {
        let Some(vendor_id) = self.gateway.find_vendor(vendor)? else {
            tracing::debug!(vendor, "未找到商家");
            return Ok(Reply::NotFound("Vendor not found.".to_string()));
        };

        let score = compute_vendor_trust(&self.gateway, vendor_id)?;
        Ok(Reply::Text(format!(
            "Vendor `{}` Trust Score: {}\n- Avg Rating: {} | Resolved: {}%",
            vendor,
            score.trust,
            round2(score.avg_rating.value()),
            score.resolved_percent()
        )))
    }

    fn top_complaints(&self) -> Result<Reply, GatewayError> {
        let counts = self.gateway.top_products(self.top_limit)?;
        if counts.is_empty() {
            return Ok(Reply::NoData);
        }
        Ok(Reply::Table {
            title: "Top complained products".to_string(),
            table: Table::from_product_counts(&counts),
        })
    }

    fn complaints_in_state(&self, state: &str) -> Result<Reply, GatewayError> {
        let count = self.gateway.count_in_state(state)?;
        Ok(Reply::Text(format!("Complaints in {}: {}", state, count)))
    }

    fn complaints_for_product(&self, product: &str) -> Result<Reply, GatewayError> {
        let counts = self.gateway.product_counts(product)?;
        if counts.is_empty() {
            return Ok(Reply::NotFound("No complaints found.".to_string()));
        }
        Ok(Reply::Table {
            title: format!("Complaints for {}", product),
            table: Table::from_product_counts(&counts),
        })
    }

    fn overview(&self) -> Result<Reply, GatewayError> {
        let totals = self.gateway.overview_totals()?;
        let avg = totals
            .avg_rating
            .map(|a| round2(a).to_string())
            .unwrap_or_else(|| "unavailable".to_string());

        Ok(Reply::Text(format!(
            "Total: {} | Resolved: {} ({}%) | Avg Rating: {}",
            totals.total,
            totals.resolved,
            round2(totals.resolved_percent()),
            avg
        )))
    }
}
