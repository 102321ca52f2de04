//! 错误类型
//!
//! "未找到"和"无法识别"不是错误，由回复类型表达。
//! 这里只包含需要向调用方传播的失败。

use thiserror::Error;

/// 持久层网关失败（连接、SQL等），原样传播给调用方，不重试
#[derive(Debug, Error)]
pub enum GatewayError {
    /// SQLite 错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// 网关不可用
    #[error("网关不可用: {0}")]
    Unavailable(String),
}

/// 投诉提交校验失败
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("投诉ID不能为空")]
    MissingId,

    #[error("评分必须在1到5之间，实际为 {0}")]
    RatingOutOfRange(i64),

    #[error("未知的投诉状态: {0}")]
    UnknownStatus(String),

    #[error("投诉记录不存在: {0}")]
    ComplaintNotFound(String),
}
