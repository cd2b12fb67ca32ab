//! 编译模块：将原始规则表编译为不可变的模式注册表
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledPattern, CompiledCategory, PatternRegistry};
pub use self::compiler::RuleCompiler;
