//! complaint-desk - 投诉与评价平台命令行
//!
//! 命令行只是展示层：负责打开数据库、读取问题、打印回复。
//! 信任分与意图解析逻辑都在库中。

use anyhow::{Context, Result};
use clap::Parser;
use complaint_desk::cli::{Cli, Command, SubmitArgs};
use complaint_desk::core::dispatcher::QUICK_QUESTIONS;
use complaint_desk::core::models::{
    AppConfig, ComplaintStatus, ComplaintSummary, Intent, NewComplaint, Priority,
};
use complaint_desk::core::trust::round2;
use complaint_desk::storage::config::ConfigManager;
use complaint_desk::{compute_vendor_trust, ComplaintGateway, Database, QueryDispatcher, Reply, Table};
use std::io::{BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ConfigManager::default_path);
    let config = ConfigManager::new(config_path.clone())
        .load()
        .with_context(|| format!("加载配置失败: {}", config_path.display()))?;

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| ConfigManager::database_path(&config));
    let db = Database::open(&db_path)
        .with_context(|| format!("打开数据库失败: {}", db_path.display()))?;

    run(cli.command, &db, &config)
}

fn run(command: Command, db: &Database, config: &AppConfig) -> Result<()> {
    let dispatcher = QueryDispatcher::new(db).with_top_limit(config.top_complaints_limit);

    match command {
        Command::Ask { text } => {
            println!("{}", dispatcher.ask(&text.join(" "))?);
        }
        Command::Chat => chat(&dispatcher)?,
        Command::Trust { vendor } => {
            println!("{}", dispatcher.dispatch(&Intent::TrustForVendor { vendor })?);
        }
        Command::Vendor { vendor } => vendor_dashboard(db, &vendor)?,
        Command::Analytics => {
            let counts = db.top_products(config.analytics_limit)?;
            if counts.is_empty() {
                println!("{}", Reply::NoData);
            } else {
                println!("Top complained products\n{}", Table::from_product_counts(&counts));
            }
        }
        Command::Stats => {
            let stats = db.quick_stats()?;
            println!(
                "Users/Records: {} | Products: {} | Vendors: {}",
                stats.records, stats.products, stats.vendors
            );
        }
        Command::Track { fragment } => {
            let complaints = db.track_complaints(&fragment)?;
            if complaints.is_empty() {
                println!("No complaints found.");
            } else {
                println!("{}", complaint_table(&complaints));
            }
        }
        Command::Submit(args) => submit(db, args)?,
        Command::Status { id, status } => {
            let parsed = ComplaintStatus::parse(&status)
                .ok_or_else(|| complaint_desk::SubmissionError::UnknownStatus(status.clone()))?;
            db.update_status(&id, parsed)?;
            println!("Complaint {} is now {}", id, parsed);
        }
        Command::AddVendor { name } => {
            println!("Vendor `{}` added with id {}", name, db.add_vendor(&name)?);
        }
        Command::AddProduct { name } => {
            println!("Product `{}` added with id {}", name, db.add_product(&name)?);
        }
        Command::Vendors => {
            for vendor in db.list_vendors()? {
                println!("{}\t{}", vendor.id, vendor.name);
            }
        }
        Command::Products => {
            for product in db.list_products()? {
                println!("{}\t{}", product.id, product.name);
            }
        }
    }

    Ok(())
}

/// 交互式聊天，网关错误打印后继续
fn chat<G: ComplaintGateway>(dispatcher: &QueryDispatcher<G>) -> Result<()> {
    println!("Support Chatbot (English + Hindi). Type 'exit' to quit.");
    println!("Quick questions: {}", QUICK_QUESTIONS.join(" | "));

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        match dispatcher.ask(line) {
            Ok(reply) => println!("{}", reply),
            Err(e) => eprintln!("查询失败: {}", e),
        }
    }
    Ok(())
}

fn vendor_dashboard(db: &Database, fragment: &str) -> Result<()> {
    let Some(vendor) = db.find_vendor(fragment)?.map(|id| db.vendor(id)).transpose()?.flatten() else {
        println!("Vendor not found.");
        return Ok(());
    };

    let score = compute_vendor_trust(db, vendor.id)?;
    println!("Vendor: {}", vendor.name);
    println!("Trust Score: {}", score.trust);
    println!("Average Rating: {}", round2(score.avg_rating.value()));
    println!("Resolved Ratio: {}%", score.resolved_percent());

    let complaints = db.vendor_complaints(vendor.id)?;
    if complaints.is_empty() {
        println!("No complaints for this vendor.");
    } else {
        println!("Complaints against this vendor\n{}", complaint_table(&complaints));
    }
    Ok(())
}

fn submit(db: &Database, args: SubmitArgs) -> Result<()> {
    let priority = Priority::parse(&args.priority)
        .with_context(|| format!("未知的优先级: {}", args.priority))?;

    let complaint = NewComplaint {
        id: args.id,
        name: args.name,
        email: args.email,
        state: args.state,
        product_id: args.product,
        vendor_id: args.vendor,
        fssai_code: args.fssai,
        complaint_text: args.text,
        priority,
        rating: args.rating,
        review: args.review,
    };

    let submission = db.submit_complaint(&complaint)?;
    if submission.renamed {
        println!(
            "User ID already existed; complaint saved as new record id: {}",
            submission.id
        );
    }
    println!("Complaint submitted: {}", submission.id);
    Ok(())
}

fn complaint_table(complaints: &[ComplaintSummary]) -> Table {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    Table {
        headers: ["id", "name", "product", "vendor", "complaint", "status", "date", "rating"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: complaints
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    text(&c.name),
                    text(&c.product_name),
                    text(&c.vendor_name),
                    c.complaint_text.clone(),
                    text(&c.status),
                    c.complaint_date.map(|d| d.to_string()).unwrap_or_default(),
                    c.rating.map(|r| r.to_string()).unwrap_or_default(),
                ]
            })
            .collect(),
    }
}
