//! 商家信任分计算模块
//!
//! 信任分由平均评分和投诉解决率混合得出：
//! - avg_rating × 0.7（0-5 分制）
//! - resolved_ratio × 100 × 0.3（0-100 百分制）
//!
//! 两项量纲不同，公式保持原样，不做归一化。
//! 计算是纯读取加算术，不缓存，可并发调用。

use crate::core::error::GatewayError;
use crate::core::gateway::ComplaintGateway;
use crate::core::models::{Sampled, TrustScore};

/// 评分权重
pub const RATING_WEIGHT: f64 = 0.7;
/// 解决率权重（作用于百分比）
pub const RESOLUTION_WEIGHT: f64 = 0.3;

/// 计算商家的信任分
///
/// 商家不存在或没有任何记录时返回 (0, 0, 0)，不视为错误。
pub fn compute_vendor_trust<G: ComplaintGateway + ?Sized>(
    gateway: &G,
    vendor_id: i64,
) -> Result<TrustScore, GatewayError> {
    let ratings = gateway.vendor_ratings(vendor_id)?;
    let statuses = gateway.vendor_statuses(vendor_id)?;

    let score = TrustScore::from_samples(&ratings, &statuses);
    tracing::debug!(
        vendor_id,
        ratings = ratings.len(),
        statuses = statuses.len(),
        trust = score.trust,
        "计算商家信任分"
    );
    Ok(score)
}

impl TrustScore {
    /// 由评分和状态样本计算信任分
    pub fn from_samples<S: AsRef<str>>(ratings: &[i64], statuses: &[S]) -> Self {
        let avg_rating = average_rating(ratings);
        let resolved_ratio = resolved_ratio(statuses);
        let raw = avg_rating.value() * RATING_WEIGHT
            + resolved_ratio.value() * 100.0 * RESOLUTION_WEIGHT;

        Self {
            trust: round2(raw),
            avg_rating,
            resolved_ratio,
        }
    }

    /// 百分比形式的解决率，保留两位小数
    pub fn resolved_percent(&self) -> f64 {
        round2(self.resolved_ratio.value() * 100.0)
    }
}

/// 平均评分，无评分时为默认值
pub fn average_rating(ratings: &[i64]) -> Sampled {
    if ratings.is_empty() {
        return Sampled::Defaulted;
    }
    let sum: i64 = ratings.iter().sum();
    Sampled::Computed {
        value: sum as f64 / ratings.len() as f64,
        samples: ratings.len(),
    }
}

/// 状态为 resolved（大小写不敏感）的比例，无状态时为默认值
pub fn resolved_ratio<S: AsRef<str>>(statuses: &[S]) -> Sampled {
    if statuses.is_empty() {
        return Sampled::Defaulted;
    }
    let resolved = statuses
        .iter()
        .filter(|s| s.as_ref().to_lowercase() == "resolved")
        .count();
    Sampled::Computed {
        value: resolved as f64 / statuses.len() as f64,
        samples: statuses.len(),
    }
}

/// 保留两位小数
///
/// 按浮点数的精确十进制值舍入，恰好位于中点时取偶数（4.625 -> 4.62）。
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
