//! k6guard - k6 负载测试脚本静态安全校验
//!
//! 不执行脚本，仅通过语法树检查与线性时间正则扫描判定脚本是否可以交给执行引擎。

// 导出全局错误类型
pub use self::error::{GuardResult, K6GuardError};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, ValidatorConfig};

// 导出规则模块核心接口
pub use self::rule::{
    is_allowed_import, is_forbidden_module, is_protocol_module, PatternCategory, PatternRule,
};

// 导出编译模块核心接口
pub use self::compiler::{CompiledPattern, PatternRegistry, RuleCompiler};

// 导出解析模块核心接口
pub use self::parser::{ParsedScript, ScriptParser};

// 导出分析器
pub use self::analyzer::{Analyzer, PatternAnalyzer, ResourceAnalyzer, StructuralAnalyzer};

// 导出数据模型
pub use self::model::{
    AnalysisVerdict, ImportFact, ResponseBuilder, ResponseKind, StructuralReport,
    ValidationRequest, ValidationResponse,
};

// 导出校验入口
pub use self::validator::{
    init_global_validator, validate_concurrently, validate_script, ScriptValidator,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod parser;
pub mod analyzer;
pub mod model;
pub mod utils;
pub mod validator;

/// 使用默认配置校验脚本（进程级共享校验器）
pub fn validate(script: &str) -> ValidationResponse {
    validate_script(script)
}
