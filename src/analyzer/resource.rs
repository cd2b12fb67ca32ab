//! 资源分析器
//! 1. 绝对大小上限：超限立即返回，不进入解析
//! 2. 在语法树中查找第一个 `vus` 属性并校验数值上限
//!
//! `vus` 的查找是结构化的：对象字面量中任何名为 vus 的属性都会命中，
//! 不限定在导出的 options 对象内，找到第一个即停止。
//!
//! 取值时先按数值字面量求真实值（`1e6`、`0x3E8`、`1_000`、`+5e2`、`(100 * 10)` 等），
//! 无法静态求值的表达式才退回 `parseInt` 语义。

use tree_sitter::Node;

use super::common::log_verdict;
use super::Analyzer;
use crate::config::ValidatorConfig;
use crate::model::AnalysisVerdict;
use crate::parser::script_tree::unquote;
use crate::parser::{ParsedScript, ScriptParser};
use crate::utils::{parse_js_int, parse_number_literal, truncate_to_js_int, JsInt, ScriptInputGuard};

/// 虚拟用户数属性名
const VUS_PROPERTY: &str = "vus";
/// 常量表达式求值的最大嵌套深度
const MAX_EVAL_DEPTH: usize = 32;

/// 资源分析器
#[derive(Debug, Clone, Copy)]
pub struct ResourceAnalyzer {
    max_script_size: usize,
    max_vus: u64,
}

impl ResourceAnalyzer {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            max_script_size: config.max_script_size,
            max_vus: config.max_vus,
        }
    }

    /// 校验第一个 vus 属性
    fn check_vus(&self, parsed: &ParsedScript<'_>, verdict: &mut AnalysisVerdict) {
        let Some(pair) = parsed.find_first(|node| is_vus_pair(parsed, node)) else {
            return;
        };
        let Some(value) = pair.child_by_field_name("value") else {
            return;
        };

        let raw = parsed.text(value);
        let vus = match eval_numeric(parsed, value, 0) {
            Some(number) => truncate_to_js_int(number),
            None => parse_js_int(raw),
        };
        match vus {
            JsInt::NaN => verdict.push_error(format!(
                "Invalid VUs value: '{}' is not a number (found: vus: {})",
                raw, raw
            )),
            JsInt::Number(vus) if exceeds(vus, self.max_vus) => verdict.push_error(format!(
                "VUs limit exceeded: {} > {} (found: vus: {})",
                vus, self.max_vus, vus
            )),
            JsInt::Number(_) => {}
        }
    }
}

impl Analyzer for ResourceAnalyzer {
    const TYPE_NAME: &'static str = "Resource";
    type Output = AnalysisVerdict;

    fn analyze(&self, script: &str) -> AnalysisVerdict {
        if let Err(violation) = ScriptInputGuard::check_size(script, self.max_script_size) {
            let verdict = AnalysisVerdict::failed(format!(
                "Script size exceeds maximum allowed: {}",
                violation
            ));
            log_verdict(Self::TYPE_NAME, &verdict);
            return verdict;
        }

        // 独立解析，语法树随作用域释放
        let parsed = match ScriptParser::parse(script) {
            Ok(parsed) => parsed,
            Err(e) => {
                let verdict = AnalysisVerdict::failed(format!("Script parsing failed: {}", e));
                log_verdict(Self::TYPE_NAME, &verdict);
                return verdict;
            }
        };

        let mut verdict = AnalysisVerdict::passed();
        self.check_vus(&parsed, &mut verdict);
        log_verdict(Self::TYPE_NAME, &verdict);
        verdict
    }
}

/// 是否为 `vus: ...` / `'vus': ...` 形式的属性
fn is_vus_pair(parsed: &ParsedScript<'_>, node: Node<'_>) -> bool {
    if node.kind() != "pair" {
        return false;
    }
    let Some(key) = node.child_by_field_name("key") else {
        return false;
    };
    match key.kind() {
        "property_identifier" => parsed.text(key) == VUS_PROPERTY,
        "string" => unquote(parsed.text(key)) == VUS_PROPERTY,
        _ => false,
    }
}

/// 对数值字面量及其正负号、括号、算术组合做静态求值
fn eval_numeric(parsed: &ParsedScript<'_>, node: Node<'_>, depth: usize) -> Option<f64> {
    if depth > MAX_EVAL_DEPTH {
        return None;
    }

    match node.kind() {
        "number" => parse_number_literal(parsed.text(node)),
        "parenthesized_expression" => {
            let inner = node.named_child(0)?;
            eval_numeric(parsed, inner, depth + 1)
        }
        "unary_expression" => {
            let operator = node.child_by_field_name("operator")?;
            let operand = eval_numeric(parsed, node.child_by_field_name("argument")?, depth + 1)?;
            match parsed.text(operator) {
                "+" => Some(operand),
                "-" => Some(-operand),
                _ => None,
            }
        }
        "binary_expression" => {
            let operator = node.child_by_field_name("operator")?;
            let left = eval_numeric(parsed, node.child_by_field_name("left")?, depth + 1)?;
            let right = eval_numeric(parsed, node.child_by_field_name("right")?, depth + 1)?;
            match parsed.text(operator) {
                "+" => Some(left + right),
                "-" => Some(left - right),
                "*" => Some(left * right),
                "/" => Some(left / right),
                "%" => Some(left % right),
                "**" => Some(left.powf(right)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn exceeds(vus: i64, max: u64) -> bool {
    u64::try_from(vus).is_ok_and(|vus| vus > max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    fn analyze(script: &str) -> AnalysisVerdict {
        ResourceAnalyzer::new(&ConfigManager::get_default()).analyze(script)
    }

    #[test]
    fn test_vus_at_ceiling_passes() {
        assert!(analyze("export const options = { vus: 500, duration: '30s' };").is_valid());
    }

    #[test]
    fn test_vus_over_ceiling() {
        let verdict = analyze("export const options = { vus: 501 };");
        assert_eq!(verdict.errors(), ["VUs limit exceeded: 501 > 500 (found: vus: 501)"]);
    }

    #[test]
    fn test_vus_not_a_number() {
        let verdict = analyze("export const options = { vus: 'abc' };");
        assert_eq!(
            verdict.errors(),
            ["Invalid VUs value: ''abc'' is not a number (found: vus: 'abc')"]
        );
    }

    #[test]
    fn test_only_first_vus_property_counts() {
        let script = "const a = { vus: 10 };\nconst b = { vus: 10000 };";
        assert!(analyze(script).is_valid());

        let script = "const a = { vus: 10000 };\nconst b = { vus: 10 };";
        assert!(!analyze(script).is_valid());
    }

    #[test]
    fn test_vus_anywhere_in_tree() {
        let script = "function f() { return { nested: { vus: 9999 } }; }";
        assert_eq!(analyze(script).errors().len(), 1);
    }

    #[test]
    fn test_quoted_key() {
        let verdict = analyze("export const options = { 'vus': 1000 };");
        assert_eq!(verdict.errors(), ["VUs limit exceeded: 1000 > 500 (found: vus: 1000)"]);
    }

    #[test]
    fn test_no_vus_property() {
        assert!(analyze("export default function () { const vus = 100000; }").is_valid());
        assert!(analyze("").is_valid());
    }

    #[test]
    fn test_numeric_literal_forms_are_evaluated() {
        let cases = [
            ("1e6", "VUs limit exceeded: 1000000 > 500 (found: vus: 1000000)"),
            ("0x3E8", "VUs limit exceeded: 1000 > 500 (found: vus: 1000)"),
            ("0b1111101000", "VUs limit exceeded: 1000 > 500 (found: vus: 1000)"),
            ("0o1750", "VUs limit exceeded: 1000 > 500 (found: vus: 1000)"),
            ("1_000", "VUs limit exceeded: 1000 > 500 (found: vus: 1000)"),
            ("501.9", "VUs limit exceeded: 501 > 500 (found: vus: 501)"),
            ("1000n", "VUs limit exceeded: 1000 > 500 (found: vus: 1000)"),
        ];
        for (literal, expected) in cases {
            let verdict = analyze(&format!("export const options = {{ vus: {} }};", literal));
            assert_eq!(verdict.errors(), [expected], "vus: {}", literal);
        }
    }

    #[test]
    fn test_literal_at_ceiling_passes() {
        assert!(analyze("export const options = { vus: 5e2 };").is_valid());
        assert!(analyze("export const options = { vus: 0x1F4 };").is_valid());
        assert!(analyze("export const options = { vus: 500.9 };").is_valid());
    }

    #[test]
    fn test_constant_expressions_are_evaluated() {
        let verdict = analyze("export const options = { vus: +1e6 };");
        assert_eq!(verdict.errors(), ["VUs limit exceeded: 1000000 > 500 (found: vus: 1000000)"]);

        let verdict = analyze("export const options = { vus: (100 * 10) };");
        assert_eq!(verdict.errors(), ["VUs limit exceeded: 1000 > 500 (found: vus: 1000)"]);

        let verdict = analyze("export const options = { vus: 2 ** 10 };");
        assert_eq!(verdict.errors(), ["VUs limit exceeded: 1024 > 500 (found: vus: 1024)"]);

        let verdict = analyze("export const options = { vus: 1e400 };");
        assert_eq!(verdict.errors().len(), 1);
        assert!(verdict.errors()[0].starts_with(&format!("VUs limit exceeded: {} > 500", i64::MAX)));
    }

    #[test]
    fn test_non_literal_values_keep_parse_int_fallback() {
        let verdict = analyze("export const options = { vus: __ENV.VUS };");
        assert_eq!(
            verdict.errors(),
            ["Invalid VUs value: '__ENV.VUS' is not a number (found: vus: __ENV.VUS)"]
        );
        assert!(analyze("export const options = { vus: 0 / 0 };").errors()[0].starts_with("Invalid VUs value"));
    }

    #[test]
    fn test_negative_vus_passes() {
        assert!(analyze("export const options = { vus: -1 };").is_valid());
    }

    #[test]
    fn test_size_ceiling() {
        let config = ConfigManager::custom().max_script_size(32).build().unwrap();
        let analyzer = ResourceAnalyzer::new(&config);

        assert!(analyzer.analyze(&"a".repeat(32)).is_valid());

        let verdict = analyzer.analyze(&"a".repeat(33));
        assert_eq!(
            verdict.errors(),
            ["Script size exceeds maximum allowed: 33 bytes > 32 bytes"]
        );
    }
}
