//! 全局校验器单例管理
//! 进程内只读共享，首次使用时按默认配置懒加载

use once_cell::sync::OnceCell;
use tracing::{debug, error, info};

use super::validator::ScriptValidator;
use crate::config::{ConfigManager, ValidatorConfig};
use crate::error::GuardResult;
use crate::model::ValidationResponse;

/// 全局校验器实例
static GLOBAL_VALIDATOR: OnceCell<ScriptValidator> = OnceCell::new();

/// 使用指定配置初始化全局校验器
/// 幂等：已初始化时保持原配置并返回 Ok(())
pub fn init_global_validator(config: ValidatorConfig) -> GuardResult<()> {
    if GLOBAL_VALIDATOR.get().is_some() {
        debug!("Global validator already initialized, skip reinitialization");
        return Ok(());
    }

    let validator = ScriptValidator::new(config)?;
    if GLOBAL_VALIDATOR.set(validator).is_err() {
        debug!("Global validator initialized concurrently by another thread");
        return Ok(());
    }

    info!("Global ScriptValidator initialized: {:?}", config);
    Ok(())
}

/// 获取全局校验器（未初始化时使用默认配置）
pub fn global_validator() -> GuardResult<&'static ScriptValidator> {
    GLOBAL_VALIDATOR.get_or_try_init(|| {
        debug!("Lazy initializing global ScriptValidator with default config");
        ScriptValidator::new(ConfigManager::get_default())
    })
}

/// 使用全局校验器校验脚本
pub fn validate_script(script: &str) -> ValidationResponse {
    match global_validator() {
        Ok(validator) => validator.validate(script),
        Err(e) => {
            error!("Global validator unavailable: {}", e);
            ValidationResponse::server_error(e.to_string())
        }
    }
}
