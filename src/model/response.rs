//! 对外响应结构
//! 每次校验只构建一次，构建后不可修改

use serde::{Deserialize, Serialize};

use crate::error::GuardResult;

/// 成功提示
pub const MESSAGE_SUCCESS: &str = "Script validation passed";
/// 校验失败提示
pub const MESSAGE_FAILURE: &str = "Script validation failed";
/// 请求无效提示
pub const MESSAGE_INVALID_REQUEST: &str = "Invalid validation request";
/// 内部错误提示
pub const MESSAGE_SERVER_ERROR: &str = "Internal error during script validation";
/// 请求体 JSON 无法解析
pub const MESSAGE_MALFORMED_JSON: &str = "Malformed JSON request body";

/// 响应形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Success,
    Failure,
    InvalidRequest,
    ServerError,
    MalformedJson,
}

impl ResponseKind {
    /// 传输层使用的状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ResponseKind::Success => 200,
            ResponseKind::Failure | ResponseKind::InvalidRequest | ResponseKind::MalformedJson => 400,
            ResponseKind::ServerError => 500,
        }
    }
}

/// 聚合后的最终校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    valid: bool,
    errors: Vec<String>,
    // 当前版本始终为空
    warnings: Vec<String>,
    message: String,
    #[serde(skip)]
    kind: ResponseKind,
}

impl ValidationResponse {
    fn new(kind: ResponseKind, errors: Vec<String>, message: &str) -> Self {
        Self {
            valid: kind == ResponseKind::Success,
            errors,
            warnings: Vec::new(),
            message: message.to_string(),
            kind,
        }
    }

    pub fn success() -> Self {
        Self::new(ResponseKind::Success, Vec::new(), MESSAGE_SUCCESS)
    }

    /// 错误列表为空时退化为成功
    pub fn failure(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            return Self::success();
        }
        Self::new(ResponseKind::Failure, errors, MESSAGE_FAILURE)
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(ResponseKind::InvalidRequest, vec![reason.into()], MESSAGE_INVALID_REQUEST)
    }

    pub fn server_error(detail: impl AsRef<str>) -> Self {
        let error = format!("{}: {}", MESSAGE_SERVER_ERROR, detail.as_ref());
        Self::new(ResponseKind::ServerError, vec![error], MESSAGE_SERVER_ERROR)
    }

    pub fn malformed_json(detail: impl AsRef<str>) -> Self {
        let error = format!("{}: {}", MESSAGE_MALFORMED_JSON, detail.as_ref());
        Self::new(ResponseKind::MalformedJson, vec![error], MESSAGE_MALFORMED_JSON)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn to_json(&self) -> GuardResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// 响应构建器：累积错误，最终生成成功或失败响应
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    errors: Vec<String>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    pub fn extend_errors<I, S>(&mut self, errors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors.extend(errors.into_iter().map(Into::into));
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn build(self) -> ValidationResponse {
        ValidationResponse::failure(self.errors)
    }
}

/// JSON 请求体：`{"script": "..."}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationRequest {
    #[serde(default)]
    pub script: Option<String>,
}

impl ValidationRequest {
    pub fn from_json(body: &str) -> GuardResult<Self> {
        Ok(serde_json::from_str(body)?)
    }
}
