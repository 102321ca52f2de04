//! 存储模块 - SQLite 数据库与配置文件

pub mod config;
pub mod database;
