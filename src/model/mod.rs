//! 数据模型：分析结论、导入事实、对外响应
pub mod verdict;
pub mod response;

pub use self::verdict::{AnalysisVerdict, ImportFact, StructuralReport};
pub use self::response::{ResponseBuilder, ResponseKind, ValidationRequest, ValidationResponse};
