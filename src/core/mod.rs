//! Core模块 - 信任分计算、意图解析与查询分发

pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod intent;
pub mod models;
pub mod trust;
