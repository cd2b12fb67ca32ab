//! 批量并发校验
//! 校验是纯 CPU 计算，放入 tokio 阻塞线程池执行，避免占用异步工作线程

use tokio::task::JoinHandle;
use tracing::error;

use super::validator::ScriptValidator;
use crate::model::ValidationResponse;

/// 并发校验多个脚本，结果顺序与输入一致
pub async fn validate_concurrently(
    validator: &ScriptValidator,
    scripts: Vec<String>,
) -> Vec<ValidationResponse> {
    let handles: Vec<JoinHandle<ValidationResponse>> = scripts
        .into_iter()
        .map(|script| {
            let validator = validator.clone();
            tokio::task::spawn_blocking(move || validator.validate(&script))
        })
        .collect();

    let mut responses = Vec::with_capacity(handles.len());
    for handle in handles {
        let response = handle.await.unwrap_or_else(|e| {
            error!("校验任务执行失败: {}", e);
            ValidationResponse::server_error(format!("validation task failed: {}", e))
        });
        responses.push(response);
    }
    responses
}
