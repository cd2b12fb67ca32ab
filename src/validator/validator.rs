//! 校验器核心：按固定顺序编排分析器，聚合错误
//!
//! 流程：
//! 1. 单次请求大小上限
//! 2. 结构分析 + 必需条件（k6 导入、协议导入、导出函数）
//! 3. 出现任何结构错误即短路返回，不执行正则扫描
//! 4. 模式分析与资源分析，合并错误

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::analyzer::{Analyzer, PatternAnalyzer, ResourceAnalyzer, StructuralAnalyzer};
use crate::compiler::PatternRegistry;
use crate::config::ValidatorConfig;
use crate::error::GuardResult;
use crate::model::{ResponseBuilder, ValidationRequest, ValidationResponse};
use crate::utils::ScriptInputGuard;

pub const MISSING_K6_IMPORT: &str = "Script must import at least one k6 module";
pub const MISSING_PROTOCOL_IMPORT: &str =
    "Script must import a protocol module (k6/http, k6/ws, or k6/net/grpc)";
pub const MISSING_EXPORTED_FUNCTION: &str =
    "Script must export a default function or a named function";
pub const SCRIPT_REQUIRED: &str = "Script content is required";

/// 脚本校验器
/// 只持有只读数据，可跨线程共享；每次校验独立创建并释放语法树
#[derive(Debug, Clone)]
pub struct ScriptValidator {
    config: ValidatorConfig,
    structural: StructuralAnalyzer,
    pattern: PatternAnalyzer,
    resource: ResourceAnalyzer,
}

impl ScriptValidator {
    /// 使用进程级共享注册表创建校验器
    pub fn new(config: ValidatorConfig) -> GuardResult<Self> {
        Ok(Self::with_registry(config, PatternRegistry::shared()?))
    }

    /// 注入指定注册表创建校验器
    pub fn with_registry(config: ValidatorConfig, registry: Arc<PatternRegistry>) -> Self {
        Self {
            config,
            structural: StructuralAnalyzer::new(registry.clone()),
            pattern: PatternAnalyzer::new(registry),
            resource: ResourceAnalyzer::new(&config),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// 校验入口，永不 panic：流程中的任何意外都转化为内部错误响应
    pub fn validate(&self, script: &str) -> ValidationResponse {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(script))) {
            Ok(response) => response,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                error!("脚本校验过程中发生未预期错误: {}", detail);
                ValidationResponse::server_error(detail)
            }
        }
    }

    /// JSON 请求体入口：`{"script": "..."}`
    pub fn validate_json(&self, body: &str) -> ValidationResponse {
        match Self::decode_request(body) {
            Ok(script) => self.validate(&script),
            Err(response) => response,
        }
    }

    /// 从 JSON 请求体中取出脚本；请求体不合法时直接给出对应响应
    pub fn decode_request(body: &str) -> Result<String, ValidationResponse> {
        match ValidationRequest::from_json(body) {
            Ok(ValidationRequest { script: Some(script) }) => Ok(script),
            Ok(ValidationRequest { script: None }) => Err(ValidationResponse::invalid_request(SCRIPT_REQUIRED)),
            Err(e) => {
                debug!("请求体解析失败: {}", e);
                Err(ValidationResponse::malformed_json(e.to_string()))
            }
        }
    }

    fn run_pipeline(&self, script: &str) -> ValidationResponse {
        if ScriptInputGuard::is_blank(script) {
            return ValidationResponse::invalid_request(SCRIPT_REQUIRED);
        }

        // 1. 单次请求大小上限
        if let Err(violation) = ScriptInputGuard::check_size(script, self.config.max_script_size) {
            warn!("脚本超出大小上限: {}", violation);
            return ValidationResponse::failure(vec![format!(
                "Script too large: {} bytes (maximum {} bytes)",
                violation.actual, violation.max
            )]);
        }

        // 2. 结构分析 + 必需条件
        let report = self.structural.analyze(script);
        let mut builder = ResponseBuilder::new();
        builder.extend_errors(report.verdict.into_errors());
        if !report.has_k6_imports {
            builder.push_error(MISSING_K6_IMPORT);
        }
        if !report.has_protocol_imports {
            builder.push_error(MISSING_PROTOCOL_IMPORT);
        }
        if !report.has_exported_function {
            builder.push_error(MISSING_EXPORTED_FUNCTION);
        }

        // 3. 结构错误短路
        if builder.has_errors() {
            debug!("结构校验未通过，跳过模式与资源分析");
            return builder.build();
        }

        // 4. 模式分析与资源分析（互不依赖），按顺序合并
        let mut scans = self.pattern.analyze(script);
        scans.merge(self.resource.analyze(script));
        builder.extend_errors(scans.into_errors());

        let response = builder.build();
        debug!("脚本校验完成 | 通过: {} | 错误数: {}", response.is_valid(), response.errors().len());
        response
    }
}

/// 提取 panic 负载中的文本
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic during validation".to_string()
    }
}
