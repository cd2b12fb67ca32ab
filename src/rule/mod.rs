//! 规则模块：模式分类、原始正则规则表、模块白名单/黑名单判定
pub mod category;
pub mod patterns;
pub mod modules;

// 导出核心接口
pub use self::category::PatternCategory;
pub use self::patterns::{PatternRule, PATTERN_RULES};
pub use self::modules::{
    is_allowed_import, is_forbidden_module, is_k6_module, is_protocol_module, is_relative_import,
    FORBIDDEN_MODULES, K6_MODULE_ROOT, PROTOCOL_MODULES,
};
