//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use tree_sitter::LanguageError;

#[derive(Error, Debug)]
pub enum K6GuardError {
    // 规则编译相关错误
    #[error("Pattern compilation failed: {0}")]
    RegexCompile(#[from] RegexError),

    // 语法解析相关错误
    #[error("Failed to load JavaScript grammar: {0}")]
    LanguageInit(#[from] LanguageError),
    #[error("Parser produced no syntax tree: {0}")]
    ParseAborted(String),

    // 配置相关错误
    #[error("Invalid configuration: {0}")]
    Config(String),

    // 基础错误
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),
}

// 全局Result类型
pub type GuardResult<T> = Result<T, K6GuardError>;
