//! 原始正则规则表
//! 仅存储规则数据，由 compiler 模块在启动时统一编译
//!
//! 所有输入均不可信，SQL 类规则的量词全部显式限界，
//! 即使换用回溯型引擎也不会出现指数级匹配。

use super::category::PatternCategory;

/// 单条原始规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    pub category: PatternCategory,
    // 规则名，仅用于日志定位
    pub name: &'static str,
    pub source: &'static str,
}

const fn rule(category: PatternCategory, name: &'static str, source: &'static str) -> PatternRule {
    PatternRule { category, name, source }
}

/// 全部规则，按分类分组，组内顺序即匹配顺序
pub static PATTERN_RULES: &[PatternRule] = &[
    // 危险函数：动态代码执行
    rule(PatternCategory::DangerousFunctions, "eval_call", r"\beval\s*\("),
    rule(PatternCategory::DangerousFunctions, "function_constructor", r"\bnew\s+Function\s*\("),
    rule(
        PatternCategory::DangerousFunctions,
        "global_function_call",
        r"\b(?:window|global|globalThis|self)\s*\.\s*Function\s*\(",
    ),
    rule(
        PatternCategory::DangerousFunctions,
        "bracket_function_access",
        r#"\[\s*["'`](?:Function|constructor)["'`]\s*\]"#,
    ),
    // XSS
    rule(PatternCategory::Xss, "script_tag", r"(?is)<script\b[^>]*>.*?</script\s*>"),
    rule(PatternCategory::Xss, "javascript_uri", r"(?i)\bjavascript\s*:"),
    rule(PatternCategory::Xss, "inline_event_handler", r"(?i)\bon(?:click|load|error|focus|blur)\s*="),
    // SQL 注入
    rule(PatternCategory::SqlInjection, "union_select", r"(?i)\bunion\s{1,10}(?:all\s{1,10})?select\b"),
    rule(PatternCategory::SqlInjection, "select_from", r"(?i)\bselect\s{1,10}[^;]{1,30}?\s{1,10}from\b"),
    rule(
        PatternCategory::SqlInjection,
        "data_modification",
        r"(?i)\b(?:drop|delete|insert|update)\s{1,10}(?:table|from|into|set)\b",
    ),
    // 代码混淆
    rule(PatternCategory::CodeObfuscation, "hex_escape", r"\\x[0-9a-fA-F]{2}"),
    rule(PatternCategory::CodeObfuscation, "unicode_escape", r"\\u[0-9a-fA-F]{4}"),
    rule(PatternCategory::CodeObfuscation, "from_char_code", r"\bString\s*\.\s*fromCharCode\b"),
];

/// 获取指定分类下的规则
pub fn rules_for(category: PatternCategory) -> impl Iterator<Item = &'static PatternRule> {
    PATTERN_RULES.iter().filter(move |r| r.category == category)
}
