//! 违规结果收集工具
//! 同一分类下相同的命中文本只记录一次（作用域为单次分析调用）

use std::collections::HashSet;

use crate::model::AnalysisVerdict;
use crate::rule::PatternCategory;

/// 违规结果收集工具
#[derive(Debug, Default)]
pub struct ViolationCollector {
    seen: HashSet<(PatternCategory, String)>,
    verdict: AnalysisVerdict,
}

impl ViolationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次命中，返回是否为新违规
    pub fn record(&mut self, category: PatternCategory, violating_code: &str) -> bool {
        if !self.seen.insert((category, violating_code.to_string())) {
            return false;
        }

        self.verdict.push_error(format!(
            "{} (found: {})",
            category.description(),
            violating_code
        ));
        true
    }

    pub fn finish(self) -> AnalysisVerdict {
        self.verdict
    }
}
