//! 各分析器的输出结构

use serde::Serialize;

use crate::compiler::PatternRegistry;

/// 单个分析器的结论
/// 只能通过 `push_error` 写入错误，保证 `valid == false` 当且仅当存在错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisVerdict {
    valid: bool,
    errors: Vec<String>,
}

impl Default for AnalysisVerdict {
    fn default() -> Self {
        Self::passed()
    }
}

impl AnalysisVerdict {
    /// 无错误的结论
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// 仅含一条错误的结论
    pub fn failed(error: impl Into<String>) -> Self {
        let mut verdict = Self::passed();
        verdict.push_error(error);
        verdict
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(error.into());
    }

    /// 合并另一个结论的错误（保持顺序）
    pub fn merge(&mut self, other: AnalysisVerdict) {
        for error in other.errors {
            self.push_error(error);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// 单条导入语句的分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFact {
    pub specifier: String,
    pub is_k6_module: bool,
    pub is_protocol_module: bool,
    pub is_relative_import: bool,
    pub is_forbidden: bool,
    pub is_unknown: bool,
}

impl ImportFact {
    /// 按注册表的白名单/黑名单判定分类
    pub fn classify(specifier: &str, registry: &PatternRegistry) -> Self {
        let is_allowed = registry.is_allowed_import(specifier);
        let is_relative_import = crate::rule::is_relative_import(specifier);
        let is_forbidden = !is_allowed && registry.is_forbidden_module(specifier);

        Self {
            specifier: specifier.to_string(),
            is_k6_module: is_allowed && !is_relative_import,
            is_protocol_module: is_allowed && registry.is_protocol_module(specifier),
            is_relative_import,
            is_forbidden,
            is_unknown: !is_allowed && !is_forbidden,
        }
    }

    pub fn is_allowed(&self) -> bool {
        !self.is_forbidden && !self.is_unknown
    }
}

/// 结构分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralReport {
    pub verdict: AnalysisVerdict,
    pub has_k6_imports: bool,
    pub has_protocol_imports: bool,
    pub has_exported_function: bool,
    pub imports: Vec<ImportFact>,
}

impl StructuralReport {
    /// 解析失败时的结果：仅一条错误，其余标志均为 false
    pub fn parse_failure(error: impl Into<String>) -> Self {
        Self {
            verdict: AnalysisVerdict::failed(error),
            has_k6_imports: false,
            has_protocol_imports: false,
            has_exported_function: false,
            imports: Vec::new(),
        }
    }
}
