//! 模式分析器
//! 直接扫描原始文本（不依赖语法树），因此字符串、注释和无法解析的片段中的危险写法同样会被发现

use std::sync::Arc;

use super::common::{log_match, log_verdict};
use super::Analyzer;
use crate::compiler::PatternRegistry;
use crate::model::AnalysisVerdict;
use crate::utils::ViolationCollector;

/// 模式分析器
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    registry: Arc<PatternRegistry>,
}

impl PatternAnalyzer {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }
}

impl Analyzer for PatternAnalyzer {
    const TYPE_NAME: &'static str = "Pattern";
    type Output = AnalysisVerdict;

    fn analyze(&self, script: &str) -> AnalysisVerdict {
        // 去重集合只在本次调用内有效
        let mut collector = ViolationCollector::new();

        for compiled in self.registry.categories() {
            for pattern in &compiled.patterns {
                let Some(violating_code) = pattern.first_match(script) else {
                    continue;
                };
                let is_new = collector.record(compiled.category, violating_code);
                log_match(Self::TYPE_NAME, compiled.category.key(), pattern.name, violating_code, is_new);
            }
        }

        let verdict = collector.finish();
        log_verdict(Self::TYPE_NAME, &verdict);
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::PatternCategory;

    fn analyzer() -> PatternAnalyzer {
        PatternAnalyzer::new(Arc::new(PatternRegistry::new().unwrap()))
    }

    #[test]
    fn test_clean_script_passes() {
        let script = "import http from 'k6/http';\nexport default function () {\n  http.get('https://test.k6.io');\n}\n";
        assert!(analyzer().analyze(script).is_valid());
    }

    #[test]
    fn test_repeated_eval_reported_once() {
        let script = "eval('a');\neval('b');\neval('c');";
        let verdict = analyzer().analyze(script);
        assert_eq!(verdict.errors().len(), 1);
        assert_eq!(
            verdict.errors()[0],
            format!("{} (found: eval()", PatternCategory::DangerousFunctions.description())
        );
    }

    #[test]
    fn test_patterns_inside_comments_and_strings() {
        let script = "// eval(payload)\nconst s = \"<script>alert(1)</script>\";";
        let verdict = analyzer().analyze(script);
        assert_eq!(verdict.errors().len(), 2);
        assert!(verdict.errors()[0].starts_with(PatternCategory::DangerousFunctions.description()));
        assert!(verdict.errors()[1].starts_with(PatternCategory::Xss.description()));
    }

    #[test]
    fn test_multiple_categories() {
        let script = "const q = 'SELECT * FROM users';\nconst c = String.fromCharCode(72);\nnew Function('x');";
        let verdict = analyzer().analyze(script);
        let errors = verdict.errors();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].ends_with("(found: new Function()"));
        assert!(errors[1].ends_with("(found: SELECT * FROM)"));
        assert!(errors[2].ends_with("(found: String.fromCharCode)"));
    }

    #[test]
    fn test_adversarial_input_is_linear() {
        // 经典回溯炸弹形态的输入，线性引擎应快速完成
        let script = format!("select {}", " ".repeat(40_000));
        let start = std::time::Instant::now();
        let _ = analyzer().analyze(&script);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }
}
