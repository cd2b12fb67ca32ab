//! 校验模块：编排三个分析器，输出最终结论
pub mod validator;
pub mod global;
pub mod concurrent;

// 导出核心接口
pub use self::validator::{
    ScriptValidator, MISSING_EXPORTED_FUNCTION, MISSING_K6_IMPORT, MISSING_PROTOCOL_IMPORT,
    SCRIPT_REQUIRED,
};
pub use self::global::{global_validator, init_global_validator, validate_script};
pub use self::concurrent::validate_concurrently;
