//! 分析器模块：结构分析、模式扫描、资源上限
//! 三个分析器互不依赖，均为全函数：任何内部错误都转化为结论中的错误信息，不向外传播
pub mod common;
pub mod structural;
pub mod pattern;
pub mod resource;

pub use self::structural::StructuralAnalyzer;
pub use self::pattern::PatternAnalyzer;
pub use self::resource::ResourceAnalyzer;

/// 所有分析器的通用抽象特质
pub trait Analyzer {
    /// 分析器类型名称，用于日志标准化输出
    const TYPE_NAME: &'static str;

    /// 分析结果类型
    type Output;

    /// 分析单个脚本；每次调用相互独立，不保留任何中间状态
    fn analyze(&self, script: &str) -> Self::Output;
}
