//! 意图解析模块
//!
//! 把自由文本（包括印地语音译的说法）转换为规范意图。
//! 解析分三步：规范化、改写、分类。改写和分类各自是一张有序规则表，
//! 按顺序匹配，第一条命中的规则生效。

use crate::core::models::{Intent, Resolution};

/// 改写规则的输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutput {
    /// 固定文本
    Literal(&'static str),
    /// 前缀 + 提取出的片段
    Fragment(&'static str),
}

/// 改写规则：印地语句式 -> 英文规范查询
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    pub name: &'static str,
    /// 任一触发词是输入的子串即命中
    pub triggers: &'static [&'static str],
    /// 提取片段前依次删除的短语
    pub strip: &'static [&'static str],
    pub output: RewriteOutput,
}

impl RewriteRule {
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t))
    }

    /// 改写文本
    ///
    /// 删除短语使用全部替换。短语不存在时片段会带上多余的词，这是可接受的。
    pub fn apply(&self, text: &str) -> String {
        match self.output {
            RewriteOutput::Literal(literal) => literal.to_string(),
            RewriteOutput::Fragment(prefix) => {
                let fragment = self
                    .strip
                    .iter()
                    .fold(text.to_string(), |acc, phrase| acc.replace(phrase, ""));
                format!("{} {}", prefix, fragment.trim())
            }
        }
    }
}

/// 内置改写规则（顺序即优先级）
pub static REWRITE_RULES: [RewriteRule; 5] = [
    RewriteRule {
        name: "state_count",
        triggers: &["me complaints kitne", "complaints kitne hain"],
        strip: &["me complaints kitne hain"],
        output: RewriteOutput::Fragment("complaints in"),
    },
    RewriteRule {
        name: "vendor_trust",
        triggers: &["vendor ka trust"],
        strip: &["vendor ka trust kya hai"],
        output: RewriteOutput::Fragment("trust vendor"),
    },
    RewriteRule {
        name: "top_complaints",
        triggers: &["sabse zyada complaints"],
        strip: &[],
        output: RewriteOutput::Literal("top complaints"),
    },
    RewriteRule {
        name: "overview",
        triggers: &["overview do", "sara data batao"],
        strip: &[],
        output: RewriteOutput::Literal("overview"),
    },
    RewriteRule {
        name: "product_count",
        triggers: &["product ke complaints"],
        strip: &["product ke complaints", "kitne hain"],
        output: RewriteOutput::Fragment("complaints for"),
    },
];

/// 分类匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// 整个文本等于其中之一
    Exact(&'static [&'static str]),
    /// 以前缀开头，参数为去掉前缀后的剩余部分
    Prefix(&'static str),
    /// 包含子串
    Contains(&'static str),
}

impl Matcher {
    /// 匹配成功时返回提取的参数（无参数时为空串）
    pub fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        match self {
            Matcher::Exact(words) => words.iter().any(|w| *w == text).then_some(""),
            Matcher::Prefix(prefix) => text.strip_prefix(*prefix).map(str::trim),
            Matcher::Contains(needle) => text.contains(*needle).then_some(""),
        }
    }
}

/// 分类规则
#[derive(Clone, Copy)]
pub struct ClassifyRule {
    pub matcher: Matcher,
    pub build: fn(&str) -> Intent,
}

fn help(_: &str) -> Intent {
    Intent::Help
}

fn trust_for_vendor(vendor: &str) -> Intent {
    Intent::TrustForVendor { vendor: vendor.to_string() }
}

fn top_complaints(_: &str) -> Intent {
    Intent::TopComplaints
}

fn complaints_in_state(state: &str) -> Intent {
    Intent::ComplaintsInState { state: state.to_string() }
}

fn complaints_for_product(product: &str) -> Intent {
    Intent::ComplaintsForProduct { product: product.to_string() }
}

fn overview(_: &str) -> Intent {
    Intent::Overview
}

/// 内置分类规则
///
/// 多个触发词互为子串（如 "top complaints" 与 "complaints in"），顺序不可调整。
pub static CLASSIFY_RULES: [ClassifyRule; 6] = [
    ClassifyRule { matcher: Matcher::Exact(&["help", "examples"]), build: help },
    ClassifyRule { matcher: Matcher::Prefix("trust vendor"), build: trust_for_vendor },
    ClassifyRule { matcher: Matcher::Contains("top complaints"), build: top_complaints },
    ClassifyRule { matcher: Matcher::Prefix("complaints in"), build: complaints_in_state },
    ClassifyRule { matcher: Matcher::Prefix("complaints for"), build: complaints_for_product },
    ClassifyRule { matcher: Matcher::Contains("overview"), build: overview },
];

/// 意图解析器
///
/// 无内部可变状态，同一输入总是得到相同结果。
#[derive(Clone, Copy)]
pub struct IntentResolver {
    rewrite_rules: &'static [RewriteRule],
    classify_rules: &'static [ClassifyRule],
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentResolver {
    /// 使用内置规则表创建解析器
    pub fn new() -> Self {
        Self {
            rewrite_rules: &REWRITE_RULES,
            classify_rules: &CLASSIFY_RULES,
        }
    }

    pub fn rewrite_rules(&self) -> &[RewriteRule] {
        self.rewrite_rules
    }

    pub fn classify_rules(&self) -> &[ClassifyRule] {
        self.classify_rules
    }

    /// 解析自由文本
    pub fn resolve(&self, text: &str) -> Resolution {
        let normalized = normalize(text);
        let (rewrite_rule, canonical) = self.rewrite(&normalized);
        let intent = self.classify(&canonical);

        tracing::debug!(
            input = %normalized,
            rule = rewrite_rule.unwrap_or("-"),
            canonical = %canonical,
            intent = intent.name(),
            "解析查询意图"
        );

        Resolution {
            normalized,
            rewrite_rule,
            canonical,
            intent,
        }
    }

    /// 应用第一条命中的改写规则，无命中时原样返回
    pub fn rewrite(&self, normalized: &str) -> (Option<&'static str>, String) {
        match self.rewrite_rules.iter().find(|r| r.matches(normalized)) {
            Some(rule) => (Some(rule.name), rule.apply(normalized)),
            None => (None, normalized.to_string()),
        }
    }

    /// 按分类规则表确定意图
    pub fn classify(&self, canonical: &str) -> Intent {
        self.classify_rules
            .iter()
            .find_map(|rule| rule.matcher.extract(canonical).map(rule.build))
            .unwrap_or(Intent::Unrecognized)
    }
}

/// 小写并去除首尾空白
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Intent {
        IntentResolver::new().resolve(text).intent
    }

    #[test]
    fn test_state_rewrite() {
        let resolution = IntentResolver::new().resolve("Delhi me complaints kitne hain");
        assert_eq!(resolution.rewrite_rule, Some("state_count"));
        assert_eq!(resolution.canonical, "complaints in delhi");
        assert_eq!(resolution.intent, Intent::ComplaintsInState { state: "delhi".to_string() });
    }

    #[test]
    fn test_vendor_trust_rewrite() {
        let resolution = IntentResolver::new().resolve("Nestle vendor ka trust kya hai");
        assert_eq!(resolution.canonical, "trust vendor nestle");
        assert_eq!(resolution.intent, Intent::TrustForVendor { vendor: "nestle".to_string() });
    }

    #[test]
    fn test_product_rewrite() {
        let resolution = IntentResolver::new().resolve("Maggi product ke complaints");
        assert_eq!(resolution.rewrite_rule, Some("product_count"));
        assert_eq!(resolution.canonical, "complaints for maggi");
        assert_eq!(
            resolution.intent,
            Intent::ComplaintsForProduct { product: "maggi".to_string() }
        );
    }

    #[test]
    fn test_state_rule_wins_over_product_rule() {
        // "complaints kitne hain" 同时触发规则1和规则5，规则1优先；
        // 规则1的删除短语不存在，片段保留多余的词
        let resolution = IntentResolver::new().resolve("Maggi product ke complaints kitne hain");
        assert_eq!(resolution.rewrite_rule, Some("state_count"));
        assert_eq!(
            resolution.intent,
            Intent::ComplaintsInState { state: "maggi product ke complaints kitne hain".to_string() }
        );

        let resolution = IntentResolver::new().resolve("Punjab complaints kitne hain");
        assert_eq!(resolution.rewrite_rule, Some("state_count"));
        assert_eq!(
            resolution.intent,
            Intent::ComplaintsInState { state: "punjab complaints kitne hain".to_string() }
        );
    }

    #[test]
    fn test_lossy_vendor_fragment() {
        assert_eq!(
            resolve("Amul vendor ka trust batao"),
            Intent::TrustForVendor { vendor: "amul vendor ka trust batao".to_string() }
        );
    }

    #[test]
    fn test_literal_rewrites() {
        assert_eq!(resolve("Sabse zyada complaints kis product pe?"), Intent::TopComplaints);
        assert_eq!(resolve("overview do"), Intent::Overview);
        assert_eq!(resolve("Sara data batao"), Intent::Overview);
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(resolve("  HELP "), Intent::Help);
        assert_eq!(resolve("examples"), Intent::Help);
        assert_eq!(resolve("help me"), Intent::Unrecognized);
        assert_eq!(resolve("show top complaints please"), Intent::TopComplaints);
        // "top complaints" 检查先于 "complaints in"
        assert_eq!(resolve("complaints in top complaints"), Intent::TopComplaints);
        assert_eq!(
            resolve("complaints for Parle-G"),
            Intent::ComplaintsForProduct { product: "parle-g".to_string() }
        );
        assert_eq!(resolve("give me an overview"), Intent::Overview);
    }

    #[test]
    fn test_prefix_requires_start() {
        assert_eq!(resolve("what is trust vendor nestle"), Intent::Unrecognized);
        assert_eq!(
            resolve("trust vendor   Britannia  "),
            Intent::TrustForVendor { vendor: "britannia".to_string() }
        );
    }

    #[test]
    fn test_unrecognized_and_empty() {
        assert_eq!(resolve("xyzzy nonsense"), Intent::Unrecognized);
        assert_eq!(resolve(""), Intent::Unrecognized);
        assert_eq!(resolve("   "), Intent::Unrecognized);
    }

    #[test]
    fn test_canonical_input_is_stable() {
        let resolver = IntentResolver::new();
        let first = resolver.resolve("top complaints");
        let second = resolver.resolve("top complaints");
        assert_eq!(first, second);
        assert_eq!(first.rewrite_rule, None);

        // 规范文本再解析一次得到同样的意图
        let rewritten = resolver.resolve("Delhi me complaints kitne hain");
        assert_eq!(resolver.resolve(&rewritten.canonical).intent, rewritten.intent);
    }

    #[test]
    fn test_rule_tables_are_ordered() {
        let resolver = IntentResolver::new();
        let names: Vec<_> = resolver.rewrite_rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["state_count", "vendor_trust", "top_complaints", "overview", "product_count"]
        );
        assert_eq!(resolver.classify_rules()[0].matcher, Matcher::Exact(&["help", "examples"]));
        assert_eq!(resolver.classify_rules()[5].matcher, Matcher::Contains("overview"));
    }
}
