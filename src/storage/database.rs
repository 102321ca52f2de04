//! 数据库存储模块
//!
//! 使用SQLite存储投诉记录、产品和商家，并实现持久层网关。

use crate::core::error::{GatewayError, SubmissionError};
use crate::core::gateway::ComplaintGateway;
use crate::core::models::{
    ComplaintRecord, ComplaintStatus, ComplaintSummary, NewComplaint, OverviewTotals, Product,
    ProductCount, QuickStats, Submission, Vendor,
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 按 Unicode 规则转小写的 SQL 函数名（内置 LOWER 只处理 ASCII）
const FOLD_FN: &str = "unicode_lower";

/// 数据库管理器
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 打开或创建数据库
    pub fn open(path: &Path) -> Result<Self> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        register_functions(&conn)?;
        let db = Self { conn };
        db.init_tables()?;
        tracing::info!("已打开数据库: {}", path.display());
        Ok(db)
    }

    /// 内存数据库（测试与临时会话）
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        let db = Self { conn };
        db.init_tables()?;
        Ok(db)
    }

    /// 初始化表结构
    fn init_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- 商家表
            CREATE TABLE IF NOT EXISTS vendors (
                vendor_id INTEGER PRIMARY KEY AUTOINCREMENT,
                vendor_name TEXT NOT NULL
            );

            -- 产品表
            CREATE TABLE IF NOT EXISTS products (
                product_id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name TEXT NOT NULL
            );

            -- 投诉记录表（每次提交一行）
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                name TEXT,
                email TEXT,
                state TEXT,
                product_id INTEGER REFERENCES products(product_id),
                vendor_id INTEGER REFERENCES vendors(vendor_id),
                product_fssai_code INTEGER,
                complaint_text TEXT NOT NULL,
                complaint_status TEXT,
                complaint_priority TEXT,
                complaint_date TEXT,
                complaint_image_url TEXT,
                rating INTEGER,
                review TEXT,
                review_date TEXT,
                review_sentiment TEXT
            );

            -- 创建索引
            CREATE INDEX IF NOT EXISTS idx_users_vendor ON users(vendor_id);
            CREATE INDEX IF NOT EXISTS idx_users_product ON users(product_id);
            CREATE INDEX IF NOT EXISTS idx_users_date ON users(complaint_date DESC);
            "#,
        )?;
        Ok(())
    }

    /// 添加商家，返回新ID
    pub fn add_vendor(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO vendors (vendor_name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// 添加产品，返回新ID
    pub fn add_product(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO products (product_name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let mut stmt = self
            .conn
            .prepare("SELECT vendor_id, vendor_name FROM vendors ORDER BY vendor_id")?;
        let vendors = stmt.query_map([], |row| {
            Ok(Vendor {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        vendors.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare("SELECT product_id, product_name FROM products ORDER BY product_id")?;
        let products = stmt.query_map([], |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        products.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 按ID读取商家
    pub fn vendor(&self, vendor_id: i64) -> Result<Option<Vendor>> {
        let vendor = self
            .conn
            .query_row(
                "SELECT vendor_id, vendor_name FROM vendors WHERE vendor_id = ?1",
                params![vendor_id],
                |row| {
                    Ok(Vendor {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(vendor)
    }

    /// 投诉ID是否已存在
    pub fn complaint_exists(&self, id: &str) -> Result<bool> {
        Ok(id_taken(&self.conn, id)?)
    }

    /// 提交投诉
    ///
    /// ID已存在时以 `<id>_<unix秒>` 保存，该ID也被占用时再追加 `_2`、`_3`……
    /// 查重和写入在同一个写事务中完成。状态初始为 Pending，投诉和评价日期为当天。
    pub fn submit_complaint(&self, complaint: &NewComplaint) -> Result<Submission> {
        let id = complaint.id.trim();
        if id.is_empty() {
            return Err(SubmissionError::MissingId.into());
        }
        if !(1..=5).contains(&complaint.rating) {
            return Err(SubmissionError::RatingOutOfRange(complaint.rating).into());
        }

        let now = Utc::now();
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let (final_id, renamed) = if id_taken(&tx, id)? {
            let base = format!("{}_{}", id, now.timestamp());
            let mut renamed_id = base.clone();
            let mut attempt = 1;
            while id_taken(&tx, &renamed_id)? {
                attempt += 1;
                renamed_id = format!("{}_{}", base, attempt);
            }
            tracing::warn!("投诉ID已存在，改为保存为: {}", renamed_id);
            (renamed_id, true)
        } else {
            (id.to_string(), false)
        };

        let today = now.date_naive().format(DATE_FORMAT).to_string();
        let fssai_code = complaint
            .fssai_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit()))
            .and_then(|c| c.parse::<i64>().ok());

        tx.execute(
            r#"
            INSERT INTO users (
                user_id, name, email, state, product_id, vendor_id, product_fssai_code,
                complaint_text, complaint_status, complaint_priority, complaint_date,
                complaint_image_url, rating, review, review_date, review_sentiment
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, ?13, ?11, NULL)
            "#,
            params![
                final_id,
                non_empty(&complaint.name),
                non_empty(&complaint.email),
                non_empty(&complaint.state),
                complaint.product_id,
                complaint.vendor_id,
                fssai_code,
                complaint.complaint_text,
                ComplaintStatus::Pending.as_str(),
                complaint.priority.as_str(),
                today,
                complaint.rating,
                non_empty(&complaint.review),
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            product_id = complaint.product_id,
            vendor_id = complaint.vendor_id,
            "已保存投诉: {}",
            final_id
        );

        Ok(Submission {
            id: final_id,
            renamed,
        })
    }

    /// 读取完整投诉记录
    pub fn complaint(&self, id: &str) -> Result<Option<ComplaintRecord>> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT user_id, name, email, state, product_id, vendor_id, product_fssai_code,
                       complaint_text, complaint_status, complaint_priority, complaint_date,
                       rating, review, review_date, review_sentiment
                FROM users
                WHERE user_id = ?1
                "#,
                params![id],
                |row| {
                    Ok(ComplaintRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        state: row.get(3)?,
                        product_id: row.get(4)?,
                        vendor_id: row.get(5)?,
                        fssai_code: row.get(6)?,
                        complaint_text: row.get(7)?,
                        status: row.get(8)?,
                        priority: row.get(9)?,
                        complaint_date: parse_date(row.get(10)?),
                        rating: row.get(11)?,
                        review: row.get(12)?,
                        review_date: parse_date(row.get(13)?),
                        review_sentiment: row.get(14)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// 更新投诉状态（商家看板）
    pub fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE users SET complaint_status = ?1 WHERE user_id = ?2",
            params![status.as_str(), id],
        )?;
        if affected == 0 {
            return Err(SubmissionError::ComplaintNotFound(id.to_string()).into());
        }
        tracing::info!("投诉 {} 状态更新为 {}", id, status);
        Ok(())
    }

    /// 按ID片段跟踪投诉，最新的在前
    pub fn track_complaints(&self, id_fragment: &str) -> Result<Vec<ComplaintSummary>> {
        self.query_summaries(
            &format!("WHERE {}(u.user_id) LIKE ?1 ESCAPE '\\'", FOLD_FN),
            &like_pattern(id_fragment),
        )
    }

    /// 某商家的全部投诉，最新的在前
    pub fn vendor_complaints(&self, vendor_id: i64) -> Result<Vec<ComplaintSummary>> {
        self.query_summaries("WHERE u.vendor_id = ?1", &vendor_id)
    }

    fn query_summaries(
        &self,
        filter: &str,
        param: &dyn rusqlite::ToSql,
    ) -> Result<Vec<ComplaintSummary>> {
        let sql = format!(
            r#"
            SELECT u.user_id, u.name, p.product_name, v.vendor_name,
                   u.complaint_text, u.complaint_status, u.complaint_priority,
                   u.complaint_date, u.rating
            FROM users u
            LEFT JOIN products p ON u.product_id = p.product_id
            LEFT JOIN vendors v ON u.vendor_id = v.vendor_id
            {}
            ORDER BY u.complaint_date DESC, u.user_id
            "#,
            filter
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([param], summary_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 首页统计：记录数、产品数、商家数
    pub fn quick_stats(&self) -> Result<QuickStats> {
        let stats = self.conn.query_row(
            r#"
            SELECT (SELECT COUNT(*) FROM users),
                   (SELECT COUNT(*) FROM products),
                   (SELECT COUNT(*) FROM vendors)
            "#,
            [],
            |row| {
                Ok(QuickStats {
                    records: row.get::<_, i64>(0)? as u64,
                    products: row.get::<_, i64>(1)? as u64,
                    vendors: row.get::<_, i64>(2)? as u64,
                })
            },
        )?;
        Ok(stats)
    }
}

impl ComplaintGateway for Database {
    fn vendor_ratings(&self, vendor_id: i64) -> Result<Vec<i64>, GatewayError> {
        let mut stmt = self.conn.prepare(
            "SELECT rating FROM users WHERE vendor_id = ?1 AND rating IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![vendor_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn vendor_statuses(&self, vendor_id: i64) -> Result<Vec<String>, GatewayError> {
        let mut stmt = self.conn.prepare(
            "SELECT complaint_status FROM users WHERE vendor_id = ?1 AND complaint_status IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![vendor_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn find_vendor(&self, name_fragment: &str) -> Result<Option<i64>, GatewayError> {
        let sql = format!(
            r#"
            SELECT vendor_id FROM vendors
            WHERE {}(vendor_name) LIKE ?1 ESCAPE '\'
            ORDER BY vendor_id
            LIMIT 1
            "#,
            FOLD_FN
        );
        let id = self
            .conn
            .query_row(
                &sql,
                params![like_pattern(name_fragment)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn top_products(&self, limit: usize) -> Result<Vec<ProductCount>, GatewayError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.product_name, COUNT(*) AS total_complaints
            FROM users u
            JOIN products p ON u.product_id = p.product_id
            GROUP BY p.product_name
            ORDER BY total_complaints DESC, p.product_name
            LIMIT ?1
            "#,
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], product_count_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn count_in_state(&self, state_fragment: &str) -> Result<u64, GatewayError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM users WHERE {}(state) LIKE ?1 ESCAPE '\\'", FOLD_FN),
            params![like_pattern(state_fragment)],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn product_counts(&self, name_fragment: &str) -> Result<Vec<ProductCount>, GatewayError> {
        let sql = format!(
            r#"
            SELECT p.product_name, COUNT(*) AS total_complaints
            FROM users u
            JOIN products p ON u.product_id = p.product_id
            WHERE {}(p.product_name) LIKE ?1 ESCAPE '\'
            GROUP BY p.product_name
            ORDER BY total_complaints DESC, p.product_name
            "#,
            FOLD_FN
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(name_fragment)], product_count_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn overview_totals(&self) -> Result<OverviewTotals, GatewayError> {
        let sql = format!(
            r#"
            SELECT COUNT(*),
                   SUM(CASE WHEN {}(complaint_status) = 'resolved' THEN 1 ELSE 0 END),
                   AVG(rating)
            FROM users
            "#,
            FOLD_FN
        );
        let totals = self.conn.query_row(
            &sql,
            [],
            |row| {
                Ok(OverviewTotals {
                    total: row.get::<_, i64>(0)? as u64,
                    resolved: row.get::<_, Option<i64>>(1)?.unwrap_or(0) as u64,
                    avg_rating: row.get(2)?,
                })
            },
        )?;
        Ok(totals)
    }
}

/// 注册自定义SQL函数
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

fn id_taken(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM users WHERE user_id = ?1 LIMIT 1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ComplaintSummary> {
    Ok(ComplaintSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        product_name: row.get(2)?,
        vendor_name: row.get(3)?,
        complaint_text: row.get(4)?,
        status: row.get(5)?,
        priority: row.get(6)?,
        complaint_date: parse_date(row.get(7)?),
        rating: row.get(8)?,
    })
}

fn product_count_from_row(row: &Row<'_>) -> rusqlite::Result<ProductCount> {
    Ok(ProductCount {
        product_name: row.get(0)?,
        total_complaints: row.get::<_, i64>(1)? as u64,
    })
}

/// 大小写不敏感的子串匹配模式，输入中的通配符按字面匹配
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for ch in fragment.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(&v, DATE_FORMAT).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SubmissionError;
    use crate::core::models::Priority;
    use crate::core::trust::compute_vendor_trust;
    use tempfile::tempdir;

    struct Fixture {
        db: Database,
        nestle: i64,
        amul: i64,
        maggi: i64,
        kitkat: i64,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let nestle = db.add_vendor("Nestle India").unwrap();
        let amul = db.add_vendor("Amul").unwrap();
        let maggi = db.add_product("Maggi Noodles").unwrap();
        let kitkat = db.add_product("KitKat").unwrap();
        Fixture { db, nestle, amul, maggi, kitkat }
    }

    fn complaint(id: &str, state: &str, product_id: i64, vendor_id: i64, rating: i64) -> NewComplaint {
        NewComplaint {
            id: id.to_string(),
            name: Some("Asha".to_string()),
            email: Some(String::new()),
            state: Some(state.to_string()),
            product_id,
            vendor_id,
            fssai_code: None,
            complaint_text: "stale packet".to_string(),
            priority: Priority::High,
            rating,
            review: None,
        }
    }

    #[test]
    fn test_database_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("data").join("complaints.db");

        let db = Database::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(db.quick_stats().unwrap(), QuickStats::default());
    }

    #[test]
    fn test_submit_and_read_back() {
        let f = fixture();
        let mut new = complaint("u1", "Delhi", f.maggi, f.nestle, 4);
        new.fssai_code = Some(" 10012345 ".to_string());

        let submission = f.db.submit_complaint(&new).unwrap();
        assert_eq!(submission, Submission { id: "u1".to_string(), renamed: false });

        let record = f.db.complaint("u1").unwrap().unwrap();
        assert_eq!(record.status.as_deref(), Some("Pending"));
        assert_eq!(record.priority.as_deref(), Some("High"));
        assert_eq!(record.email, None);
        assert_eq!(record.fssai_code, Some(10012345));
        assert_eq!(record.rating, Some(4));
        assert!(record.complaint_date.is_some());
        assert_eq!(record.complaint_date, record.review_date);
    }

    #[test]
    fn test_duplicate_id_gets_timestamp_suffix() {
        let f = fixture();
        f.db.submit_complaint(&complaint("u1", "Delhi", f.maggi, f.nestle, 4)).unwrap();

        let second = f.db.submit_complaint(&complaint("u1", "Delhi", f.maggi, f.nestle, 2)).unwrap();
        assert!(second.renamed);
        assert!(second.id.starts_with("u1_"));
        assert!(second.id["u1_".len()..].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(f.db.quick_stats().unwrap().records, 2);
    }

    #[test]
    fn test_repeated_duplicates_get_distinct_ids() {
        let f = fixture();
        let ids: Vec<String> = (0..4)
            .map(|_| f.db.submit_complaint(&complaint("dup", "Goa", f.kitkat, f.amul, 3)).unwrap().id)
            .collect();

        assert_eq!(ids[0], "dup");
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert!(ids[1..].iter().all(|id| id.starts_with("dup_")));
        assert_eq!(f.db.quick_stats().unwrap().records, 4);
    }

    #[test]
    fn test_submission_validation() {
        let f = fixture();
        let err = f.db.submit_complaint(&complaint("  ", "Delhi", f.maggi, f.nestle, 4)).unwrap_err();
        assert_eq!(err.downcast_ref::<SubmissionError>(), Some(&SubmissionError::MissingId));

        let err = f.db.submit_complaint(&complaint("u9", "Delhi", f.maggi, f.nestle, 6)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SubmissionError>(),
            Some(&SubmissionError::RatingOutOfRange(6))
        );

        let mut bad_code = complaint("u10", "Delhi", f.maggi, f.nestle, 3);
        bad_code.fssai_code = Some("FS-12".to_string());
        f.db.submit_complaint(&bad_code).unwrap();
        assert_eq!(f.db.complaint("u10").unwrap().unwrap().fssai_code, None);
    }

    #[test]
    fn test_vendor_trust_from_database() {
        let f = fixture();
        f.db.submit_complaint(&complaint("a", "Delhi", f.maggi, f.nestle, 4)).unwrap();
        f.db.submit_complaint(&complaint("b", "Delhi", f.maggi, f.nestle, 5)).unwrap();
        f.db.update_status("a", ComplaintStatus::Resolved).unwrap();

        let score = compute_vendor_trust(&f.db, f.nestle).unwrap();
        assert!((score.trust - 18.15).abs() < 1e-9);

        let score = compute_vendor_trust(&f.db, f.amul).unwrap();
        assert_eq!(score.trust, 0.0);
        assert!(score.avg_rating.is_defaulted());
    }

    #[test]
    fn test_update_status_unknown_id() {
        let f = fixture();
        let err = f.db.update_status("missing", ComplaintStatus::Resolved).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SubmissionError>(),
            Some(&SubmissionError::ComplaintNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_find_vendor_is_case_insensitive_substring() {
        let f = fixture();
        assert_eq!(f.db.find_vendor("NESTLE").unwrap(), Some(f.nestle));
        assert_eq!(f.db.find_vendor("india").unwrap(), Some(f.nestle));
        assert_eq!(f.db.find_vendor("mul").unwrap(), Some(f.amul));
        assert_eq!(f.db.find_vendor("britannia").unwrap(), None);
        // 通配符按字面匹配
        assert_eq!(f.db.find_vendor("%").unwrap(), None);
        assert_eq!(f.db.find_vendor("n_stle").unwrap(), None);
    }

    #[test]
    fn test_non_ascii_matching_is_case_insensitive() {
        let f = fixture();
        let nestle_accented = f.db.add_vendor("NESTLÉ SUISSE").unwrap();
        let creme = f.db.add_product("CRÈME WAFERS").unwrap();
        f.db.submit_complaint(&complaint("x1", "PONDICHÉRY", creme, nestle_accented, 3)).unwrap();
        f.db.submit_complaint(&complaint("x2", "Pondichéry", creme, nestle_accented, 4)).unwrap();

        assert_eq!(f.db.find_vendor("nestlé").unwrap(), Some(nestle_accented));
        assert_eq!(f.db.find_vendor("Suisse").unwrap(), Some(nestle_accented));
        assert_eq!(f.db.count_in_state("pondichéry").unwrap(), 2);
        assert_eq!(
            f.db.product_counts("crème").unwrap(),
            vec![ProductCount { product_name: "CRÈME WAFERS".to_string(), total_complaints: 2 }]
        );
    }

    #[test]
    fn test_find_vendor_takes_first_match() {
        let f = fixture();
        let second = f.db.add_vendor("Nestle Foods").unwrap();
        assert!(second > f.nestle);
        assert_eq!(f.db.find_vendor("nestle").unwrap(), Some(f.nestle));
    }

    #[test]
    fn test_aggregates() {
        let f = fixture();
        f.db.submit_complaint(&complaint("a", "New Delhi", f.maggi, f.nestle, 4)).unwrap();
        f.db.submit_complaint(&complaint("b", "delhi", f.maggi, f.nestle, 2)).unwrap();
        f.db.submit_complaint(&complaint("c", "Punjab", f.kitkat, f.nestle, 3)).unwrap();
        f.db.update_status("c", ComplaintStatus::Resolved).unwrap();

        assert_eq!(f.db.count_in_state("DELHI").unwrap(), 2);
        assert_eq!(f.db.count_in_state("kerala").unwrap(), 0);

        let top = f.db.top_products(5).unwrap();
        assert_eq!(top[0], ProductCount { product_name: "Maggi Noodles".to_string(), total_complaints: 2 });
        assert_eq!(top.len(), 2);
        assert_eq!(f.db.top_products(1).unwrap().len(), 1);
        // 超出 i64 的上限按"不限"处理
        assert_eq!(f.db.top_products(usize::MAX).unwrap().len(), 2);

        let counts = f.db.product_counts("kit").unwrap();
        assert_eq!(counts, vec![ProductCount { product_name: "KitKat".to_string(), total_complaints: 1 }]);
        assert!(f.db.product_counts("bournvita").unwrap().is_empty());

        let totals = f.db.overview_totals().unwrap();
        assert_eq!(totals.total, 3);
        assert_eq!(totals.resolved, 1);
        assert!((totals.avg_rating.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_on_empty_store() {
        let f = fixture();
        let totals = f.db.overview_totals().unwrap();
        assert_eq!(totals, OverviewTotals { total: 0, resolved: 0, avg_rating: None });
        assert!(f.db.top_products(5).unwrap().is_empty());
    }

    #[test]
    fn test_track_and_vendor_listing() {
        let f = fixture();
        f.db.submit_complaint(&complaint("ravi-01", "Delhi", f.maggi, f.nestle, 4)).unwrap();
        f.db.submit_complaint(&complaint("RAVI-02", "Delhi", f.kitkat, f.amul, 4)).unwrap();
        f.db.submit_complaint(&complaint("meera", "Goa", f.kitkat, f.amul, 4)).unwrap();

        let tracked = f.db.track_complaints("Ravi").unwrap();
        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked[0].id, "RAVI-02");
        assert_eq!(tracked[0].vendor_name.as_deref(), Some("Amul"));

        let listing = f.db.vendor_complaints(f.amul).unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|c| c.product_name.as_deref() == Some("KitKat")));

        let stats = f.db.quick_stats().unwrap();
        assert_eq!(stats, QuickStats { records: 3, products: 2, vendors: 2 });
        assert_eq!(f.db.vendor(f.amul).unwrap().unwrap().name, "Amul");
        assert_eq!(f.db.list_products().unwrap().len(), 2);
        assert_eq!(f.db.list_vendors().unwrap()[0].name, "Nestle India");
    }
}
