//! complaint-desk - 投诉与评价平台核心
//!
//! - 商家信任分：由评分与投诉解决率计算，不缓存
//! - 聊天机器人：中英（印地语音译）问句 -> 规范意图 -> 聚合查询
//! - 持久层通过网关注入，连接生命周期由调用方管理

pub mod cli;
pub mod core;
pub mod storage;

pub use crate::core::dispatcher::{QueryDispatcher, Reply, Table};
pub use crate::core::error::{GatewayError, SubmissionError};
pub use crate::core::gateway::ComplaintGateway;
pub use crate::core::intent::IntentResolver;
pub use crate::core::models::{Intent, Resolution, TrustScore};
pub use crate::core::trust::compute_vendor_trust;
pub use crate::storage::database::Database;
