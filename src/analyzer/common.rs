use tracing::{debug, warn};

use crate::model::AnalysisVerdict;

/// 分析完成通用处理器 - 标准日志输出
#[inline(always)]
pub fn log_verdict(analyzer_type: &str, verdict: &AnalysisVerdict) {
    if verdict.is_valid() {
        debug!("[{}]分析通过", analyzer_type);
    } else {
        warn!(
            "[{}]分析未通过 | 错误数: {} | 错误: {:?}",
            analyzer_type,
            verdict.errors().len(),
            verdict.errors()
        );
    }
}

/// 命中规则通用处理器
#[inline(always)]
pub fn log_match(analyzer_type: &str, category: &str, rule_name: &str, evidence: &str, is_new: bool) {
    debug!(
        "[{}]规则命中 | 分类: {} | 规则: {} | 内容: {} | 新违规: {}",
        analyzer_type, category, rule_name, evidence, is_new
    );
}
