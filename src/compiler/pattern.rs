//! 编译后模式模型
//! 注册表构建后只读，可被任意多个线程并发共享

use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::Regex;

use super::compiler::RuleCompiler;
use crate::error::GuardResult;
use crate::rule::{self, PatternCategory};

/// 编译后的单条正则
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl CompiledPattern {
    /// 返回第一处命中的文本
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// 单个分类下编译后的规则集合
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    pub category: PatternCategory,
    pub patterns: Vec<CompiledPattern>,
}

/// 模式注册表：编译后的正则集合 + 模块判定
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    // 顺序与 PatternCategory::ALL 一致
    categories: Vec<CompiledCategory>,
}

/// 进程级共享注册表，首次访问时编译
static SHARED_REGISTRY: OnceCell<Arc<PatternRegistry>> = OnceCell::new();

impl PatternRegistry {
    pub(crate) fn from_categories(categories: Vec<CompiledCategory>) -> Self {
        Self { categories }
    }

    /// 编译内置规则，生成新的注册表实例
    pub fn new() -> GuardResult<Self> {
        RuleCompiler::compile_builtin()
    }

    /// 获取进程级共享注册表（仅编译一次）
    pub fn shared() -> GuardResult<Arc<PatternRegistry>> {
        SHARED_REGISTRY
            .get_or_try_init(|| RuleCompiler::compile_builtin().map(Arc::new))
            .cloned()
    }

    /// 按固定顺序遍历所有分类
    pub fn categories(&self) -> impl Iterator<Item = &CompiledCategory> {
        self.categories.iter()
    }

    /// 获取指定分类的规则
    pub fn patterns(&self, category: PatternCategory) -> &[CompiledPattern] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.patterns.as_slice())
            .unwrap_or(&[])
    }

    /// 规则总数
    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }

    pub fn is_forbidden_module(&self, name: &str) -> bool {
        rule::is_forbidden_module(name)
    }

    pub fn is_allowed_import(&self, specifier: &str) -> bool {
        rule::is_allowed_import(specifier)
    }

    pub fn is_protocol_module(&self, specifier: &str) -> bool {
        rule::is_protocol_module(specifier)
    }
}
