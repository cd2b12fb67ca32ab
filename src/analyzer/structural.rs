//! 结构分析器
//! 单次解析，同一遍遍历中完成导入分类与导出入口函数检测

use std::sync::Arc;

use tracing::debug;
use tree_sitter::Node;

use super::common::log_verdict;
use super::Analyzer;
use crate::compiler::PatternRegistry;
use crate::model::{AnalysisVerdict, ImportFact, StructuralReport};
use crate::parser::script_tree::unquote;
use crate::parser::{ParsedScript, ScriptParser};

/// 可作为入口的函数声明节点
const FUNCTION_DECLARATION_KINDS: &[&str] = &["function_declaration", "generator_function_declaration"];
/// 可作为 `export default` 值的函数表达式节点（旧版语法中匿名函数节点名为 function）
const FUNCTION_EXPRESSION_KINDS: &[&str] = &["function_expression", "function", "generator_function"];

/// 结构分析器
#[derive(Debug, Clone)]
pub struct StructuralAnalyzer {
    registry: Arc<PatternRegistry>,
}

impl StructuralAnalyzer {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// 遍历顶层语句，收集导入事实与导出信息
    fn inspect(&self, parsed: &ParsedScript<'_>) -> StructuralReport {
        let mut verdict = AnalysisVerdict::passed();
        let mut imports = Vec::new();
        let mut has_exported_function = false;

        for node in parsed.top_level_nodes() {
            match node.kind() {
                "import_statement" => {
                    if let Some(specifier) = module_specifier(parsed, node) {
                        imports.push(self.classify(specifier, &mut verdict));
                    }
                }
                "export_statement" => {
                    if is_exported_function(node) {
                        has_exported_function = true;
                    }
                    // export ... from 'x' 与导入同等对待
                    if let Some(specifier) = module_specifier(parsed, node) {
                        imports.push(self.classify(specifier, &mut verdict));
                    }
                }
                _ => {}
            }
        }

        StructuralReport {
            has_k6_imports: imports.iter().any(ImportFact::is_allowed),
            has_protocol_imports: imports.iter().any(|i| i.is_protocol_module),
            has_exported_function,
            verdict,
            imports,
        }
    }

    /// 对单个模块说明符分类，违规时写入错误
    fn classify(&self, specifier: &str, verdict: &mut AnalysisVerdict) -> ImportFact {
        let fact = ImportFact::classify(specifier, &self.registry);
        debug!("[{}]导入分类 | {:?}", Self::TYPE_NAME, fact);

        if fact.is_forbidden {
            verdict.push_error(format!("Forbidden Node.js module: {}", specifier));
        } else if fact.is_unknown {
            verdict.push_error(format!("Unknown/disallowed import: {}", specifier));
        }
        fact
    }
}

impl Analyzer for StructuralAnalyzer {
    const TYPE_NAME: &'static str = "Structural";
    type Output = StructuralReport;

    fn analyze(&self, script: &str) -> StructuralReport {
        // 语法树仅在本作用域内存活，任何返回路径都会释放
        let parsed = match ScriptParser::parse(script) {
            Ok(parsed) => parsed,
            Err(e) => {
                let report = StructuralReport::parse_failure(format!("Script parsing failed: {}", e));
                log_verdict(Self::TYPE_NAME, &report.verdict);
                return report;
            }
        };

        if let Some(location) = parsed.first_syntax_error() {
            let report = StructuralReport::parse_failure(format!(
                "Script parsing failed: syntax error at {}",
                location
            ));
            log_verdict(Self::TYPE_NAME, &report.verdict);
            return report;
        }

        let report = self.inspect(&parsed);
        debug!(
            "[{}]导入{}条 | k6导入: {} | 协议导入: {} | 导出函数: {}",
            Self::TYPE_NAME,
            report.imports.len(),
            report.has_k6_imports,
            report.has_protocol_imports,
            report.has_exported_function
        );
        log_verdict(Self::TYPE_NAME, &report.verdict);
        report
    }
}

/// 提取 import / export-from 语句的模块说明符
fn module_specifier<'s>(parsed: &ParsedScript<'s>, node: Node<'_>) -> Option<&'s str> {
    node.child_by_field_name("source")
        .map(|source| unquote(parsed.text(source)))
}

/// 是否导出了函数：`export [async] function f() {}` 或 `export default function () {}`
fn is_exported_function(node: Node<'_>) -> bool {
    let declares_function = node
        .child_by_field_name("declaration")
        .is_some_and(|decl| FUNCTION_DECLARATION_KINDS.contains(&decl.kind()));
    let exports_function_value = node
        .child_by_field_name("value")
        .is_some_and(|value| FUNCTION_EXPRESSION_KINDS.contains(&value.kind()));

    declares_function || exports_function_value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(script: &str) -> StructuralReport {
        StructuralAnalyzer::new(Arc::new(PatternRegistry::new().unwrap())).analyze(script)
    }

    #[test]
    fn test_k6_protocol_import_with_default_export() {
        let report = analyze("import http from 'k6/http';\nexport default function () {}\n");
        assert!(report.verdict.is_valid());
        assert!(report.has_k6_imports);
        assert!(report.has_protocol_imports);
        assert!(report.has_exported_function);
        assert_eq!(report.imports.len(), 1);
        assert_eq!(report.imports[0].specifier, "k6/http");
    }

    #[test]
    fn test_forbidden_module() {
        let report = analyze("import fs from 'fs';\nexport default function () {}\n");
        assert!(!report.verdict.is_valid());
        assert_eq!(report.verdict.errors(), ["Forbidden Node.js module: fs"]);
        assert!(!report.has_k6_imports);
    }

    #[test]
    fn test_unknown_import() {
        let report = analyze("import x from 'left-pad';\n");
        assert_eq!(report.verdict.errors(), ["Unknown/disallowed import: left-pad"]);
    }

    #[test]
    fn test_relative_import_is_allowed_without_protocol() {
        let report = analyze("import y from './local.js';\n");
        assert!(report.verdict.is_valid());
        assert!(report.has_k6_imports);
        assert!(!report.has_protocol_imports);
        assert!(report.imports[0].is_relative_import);
    }

    #[test]
    fn test_side_effect_and_named_imports() {
        let report = analyze("import 'k6/ws';\nimport { check, sleep } from \"k6\";\n");
        assert!(report.verdict.is_valid());
        assert!(report.has_protocol_imports);
        let specifiers: Vec<_> = report.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specifiers, vec!["k6/ws", "k6"]);
    }

    #[test]
    fn test_reexport_is_classified() {
        let report = analyze("export { readFile } from 'fs';\nexport * from 'k6/http';\n");
        assert_eq!(report.verdict.errors(), ["Forbidden Node.js module: fs"]);
        assert!(report.has_protocol_imports);
        assert!(!report.has_exported_function);
    }

    #[test]
    fn test_export_detection() {
        assert!(!analyze("function main() {}\n").has_exported_function);
        assert!(analyze("export default function () {}\n").has_exported_function);
        assert!(analyze("export default function main() {}\n").has_exported_function);
        assert!(analyze("export function setup() {}\n").has_exported_function);
        assert!(analyze("export async function run() {}\n").has_exported_function);
        assert!(!analyze("export const options = { vus: 1 };\n").has_exported_function);
        assert!(!analyze("export default 42;\n").has_exported_function);
    }

    #[test]
    fn test_syntax_error_is_single_error() {
        let report = analyze("import http from 'k6/http';\nexport default function ( {\n");
        assert_eq!(report.verdict.errors().len(), 1);
        assert!(report.verdict.errors()[0].starts_with("Script parsing failed: syntax error at line"));
        assert!(!report.has_k6_imports);
        assert!(report.imports.is_empty());
    }

    #[test]
    fn test_multiple_violations_are_all_reported() {
        let report = analyze("import fs from 'fs';\nimport cp from 'child_process';\nimport x from 'lodash';\n");
        assert_eq!(
            report.verdict.errors(),
            [
                "Forbidden Node.js module: fs",
                "Forbidden Node.js module: child_process",
                "Unknown/disallowed import: lodash",
            ]
        );
    }
}
