//! 违规模式分类定义

use std::fmt;
use serde::{Deserialize, Serialize};

/// 违规模式分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    DangerousFunctions,
    Xss,
    SqlInjection,
    CodeObfuscation,
}

impl PatternCategory {
    /// 固定扫描顺序
    pub const ALL: [PatternCategory; 4] = [
        PatternCategory::DangerousFunctions,
        PatternCategory::Xss,
        PatternCategory::SqlInjection,
        PatternCategory::CodeObfuscation,
    ];

    /// 稳定标识，用于日志
    pub fn key(&self) -> &'static str {
        match self {
            PatternCategory::DangerousFunctions => "dangerous_functions",
            PatternCategory::Xss => "xss",
            PatternCategory::SqlInjection => "sql_injection",
            PatternCategory::CodeObfuscation => "code_obfuscation",
        }
    }

    /// 面向用户的错误描述
    pub fn description(&self) -> &'static str {
        match self {
            PatternCategory::DangerousFunctions => {
                "Script contains dangerous functions that could execute arbitrary code"
            }
            PatternCategory::Xss => "Script contains potential XSS patterns",
            PatternCategory::SqlInjection => "Script contains potential SQL injection patterns",
            PatternCategory::CodeObfuscation => "Script contains obfuscated code patterns",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
