//! 语法解析模块：基于 tree-sitter 将脚本文本解析为语法树
pub mod script_tree;

pub use self::script_tree::{ParsedScript, ScriptParser, SyntaxErrorLocation};
