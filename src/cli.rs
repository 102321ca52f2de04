//! 命令行参数定义

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 投诉与评价平台命令行
#[derive(Debug, Parser)]
#[command(name = "complaint-desk", version, about = "Complaint desk: vendor trust scores and a bilingual chatbot")]
pub struct Cli {
    /// 数据库文件路径（覆盖配置）
    #[arg(long, global = true, env = "COMPLAINT_DESK_DB")]
    pub db: Option<PathBuf>,

    /// 配置文件路径
    #[arg(long, global = true, env = "COMPLAINT_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 向聊天机器人提问
    Ask {
        /// 问题文本
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// 交互式聊天（逐行读取标准输入）
    Chat,
    /// 查询商家信任分
    Trust {
        /// 商家名称片段
        vendor: String,
    },
    /// 商家看板：信任分与投诉列表
    Vendor {
        /// 商家名称片段
        vendor: String,
    },
    /// 投诉最多的产品
    Analytics,
    /// 记录、产品、商家数量
    Stats,
    /// 按ID片段跟踪投诉
    Track {
        /// 投诉ID片段
        fragment: String,
    },
    /// 提交投诉
    Submit(SubmitArgs),
    /// 更新投诉状态
    Status {
        /// 投诉ID
        id: String,
        /// Pending | "In Progress" | Resolved
        status: String,
    },
    /// 添加商家
    AddVendor { name: String },
    /// 添加产品
    AddProduct { name: String },
    /// 列出商家
    Vendors,
    /// 列出产品
    Products,
}

/// 投诉提交参数
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// 投诉ID（已存在时自动追加时间戳）
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// 邦/地区
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub product: i64,
    #[arg(long)]
    pub vendor: i64,
    /// FSSAI 许可编码
    #[arg(long)]
    pub fssai: Option<String>,
    /// 投诉内容
    #[arg(long)]
    pub text: String,
    /// Low | Medium | High
    #[arg(long, default_value = "Medium")]
    pub priority: String,
    /// 评分 (1-5)
    #[arg(long, default_value_t = 3)]
    pub rating: i64,
    #[arg(long)]
    pub review: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::parse_from(["complaint-desk", "--db", "x.db", "ask", "Delhi", "me", "complaints"]);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Command::Ask { text } => assert_eq!(text.join(" "), "Delhi me complaints"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_submit_defaults() {
        let cli = Cli::parse_from([
            "complaint-desk", "submit", "--id", "u1", "--product", "1", "--vendor", "2", "--text", "stale",
        ]);
        match cli.command {
            Command::Submit(args) => {
                assert_eq!(args.priority, "Medium");
                assert_eq!(args.rating, 3);
                assert!(args.state.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
