//! JavaScript 语法树封装
//!
//! 每次分析都新建 Parser 与语法树，不跨调用复用：
//! tree-sitter 的 `Parser` 不是 `Sync`，语法树也不应在两次校验之间共享。
//! `ParsedScript` 持有语法树所有权，离开作用域即释放（包括提前返回与 panic 展开路径）。

use std::fmt;

use tracing::trace;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{GuardResult, K6GuardError};

/// 语法错误位置（1-based）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxErrorLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// 脚本解析器
pub struct ScriptParser;

impl ScriptParser {
    /// 解析脚本文本，返回独占的语法树
    pub fn parse(source: &str) -> GuardResult<ParsedScript<'_>> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_javascript::LANGUAGE.into())?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            K6GuardError::ParseAborted("parser returned no tree".to_string())
        })?;

        trace!("语法树已创建，源码{}字节", source.len());
        Ok(ParsedScript { source, tree })
    }
}

/// 单次分析独占的语法树
pub struct ParsedScript<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> ParsedScript<'s> {
    /// 根节点（program）
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// 节点对应的源码片段
    pub fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// 顶层语句
    pub fn top_level_nodes(&self) -> Vec<Node<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        let nodes = root.named_children(&mut cursor).collect();
        nodes
    }

    /// 先序遍历整棵树，返回第一个满足条件的节点（按源码顺序，找到即停止）
    /// 使用游标迭代而非递归，深层嵌套的输入不会耗尽调用栈
    pub fn find_first<F>(&self, mut predicate: F) -> Option<Node<'_>>
    where
        F: FnMut(Node<'_>) -> bool,
    {
        let mut cursor = self.root().walk();
        loop {
            let node = cursor.node();
            if predicate(node) {
                return Some(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    /// 是否包含语法错误
    pub fn has_syntax_error(&self) -> bool {
        self.root().has_error()
    }

    /// 第一处语法错误的位置（先序遍历，只深入含错误的子树）
    pub fn first_syntax_error(&self) -> Option<SyntaxErrorLocation> {
        if !self.has_syntax_error() {
            return None;
        }
        let root = self.root();

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                let point = node.start_position();
                return Some(SyntaxErrorLocation {
                    line: point.row + 1,
                    column: point.column + 1,
                });
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node
                .children(&mut cursor)
                .filter(|child| child.has_error())
                .collect();
            // 逆序入栈，保证按源码顺序出栈
            stack.extend(children.into_iter().rev());
        }

        // has_error 为真但未定位到具体节点时，退回根节点位置
        Some(SyntaxErrorLocation { line: 1, column: 1 })
    }
}

impl Drop for ParsedScript<'_> {
    fn drop(&mut self) {
        trace!("语法树已释放，源码{}字节", self.source.len());
    }
}

/// 去掉字符串字面量两侧的引号
pub fn unquote(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}
