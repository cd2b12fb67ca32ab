//! 规则编译器核心
//! 仅负责将原始规则编译为可执行的正则模式
//!
//! regex crate 基于有限自动机实现，匹配耗时与输入长度成线性关系，
//! 不存在回溯爆炸；不支持环视与反向引用的写法会在编译期直接报错。

use std::time::Instant;

use regex::RegexBuilder;
use tracing::debug;

use super::pattern::{CompiledCategory, CompiledPattern, PatternRegistry};
use crate::error::GuardResult;
use crate::rule::{PatternCategory, PatternRule, PATTERN_RULES};

/// 单条正则编译产物大小上限
const REGEX_SIZE_LIMIT: usize = 1 << 20;
/// 懒构建 DFA 缓存上限
const DFA_SIZE_LIMIT: usize = 2 << 20;

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译内置规则表
    pub fn compile_builtin() -> GuardResult<PatternRegistry> {
        Self::compile(PATTERN_RULES)
    }

    /// 编译任意规则表，按 PatternCategory::ALL 顺序分组
    pub fn compile(rules: &[PatternRule]) -> GuardResult<PatternRegistry> {
        let start = Instant::now();
        let mut categories = Vec::with_capacity(PatternCategory::ALL.len());

        for category in PatternCategory::ALL {
            let patterns = rules
                .iter()
                .filter(|r| r.category == category)
                .map(Self::compile_single_pattern)
                .collect::<GuardResult<Vec<_>>>()?;

            debug!("分类 {} 编译完成，规则{}条", category, patterns.len());
            categories.push(CompiledCategory { category, patterns });
        }

        let registry = PatternRegistry::from_categories(categories);
        debug!(
            "✅ 规则编译完成，共{}条，总耗时{:?}",
            registry.pattern_count(),
            start.elapsed()
        );
        Ok(registry)
    }

    /// 编译单条规则
    fn compile_single_pattern(rule: &PatternRule) -> GuardResult<CompiledPattern> {
        let regex = RegexBuilder::new(rule.source)
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(DFA_SIZE_LIMIT)
            .build()?;

        Ok(CompiledPattern {
            name: rule.name,
            regex,
        })
    }
}
