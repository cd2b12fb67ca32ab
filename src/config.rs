//! 全局配置管理,存储所有可配置的资源上限
//! 进程启动时确定，校验器生命周期内不可变

use std::path::Path;

use serde::Deserialize;

use crate::error::{GuardResult, K6GuardError};

/// 默认脚本大小上限（50KB）
pub const DEFAULT_MAX_SCRIPT_SIZE: usize = 50 * 1024;
/// 默认虚拟用户数上限
pub const DEFAULT_MAX_VUS: u64 = 500;
/// 任何配置都不能突破的脚本大小硬上限（1MB）
pub const HARD_MAX_SCRIPT_SIZE: usize = 1024 * 1024;

/// 环境变量：脚本大小上限
pub const ENV_MAX_SCRIPT_SIZE: &str = "K6GUARD_MAX_SCRIPT_SIZE";
/// 环境变量：虚拟用户数上限
pub const ENV_MAX_VUS: &str = "K6GUARD_MAX_VUS";

/// 校验器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    // 脚本最大字节数
    pub max_script_size: usize,
    // vus 配置项允许的最大值
    pub max_vus: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            max_vus: DEFAULT_MAX_VUS,
        }
    }
}

/// JSON配置文件结构，字段均可省略
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    max_script_size: Option<usize>,
    max_vus: Option<u64>,
}

impl ValidatorConfig {
    /// 从进程环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> GuardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载，便于测试注入
    pub fn from_lookup<F>(lookup: F) -> GuardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = CustomConfigBuilder::new();

        if let Some(raw) = lookup(ENV_MAX_SCRIPT_SIZE) {
            let size = raw.trim().parse::<usize>().map_err(|e| {
                K6GuardError::Config(format!("{}='{}' is not a valid size: {}", ENV_MAX_SCRIPT_SIZE, raw, e))
            })?;
            builder = builder.max_script_size(size);
        }

        if let Some(raw) = lookup(ENV_MAX_VUS) {
            let vus = raw.trim().parse::<u64>().map_err(|e| {
                K6GuardError::Config(format!("{}='{}' is not a valid VU count: {}", ENV_MAX_VUS, raw, e))
            })?;
            builder = builder.max_vus(vus);
        }

        builder.build()
    }

    /// 从JSON配置文件加载（未出现的项使用默认值）
    pub fn from_json_file(path: impl AsRef<Path>) -> GuardResult<Self> {
        Self::default().overlay_json_file(path)
    }

    /// 从JSON字符串加载
    pub fn from_json_str(content: &str) -> GuardResult<Self> {
        Self::default().overlay_json_str(content)
    }

    /// 以当前配置为底，叠加JSON配置文件中出现的项
    pub fn overlay_json_file(self, path: impl AsRef<Path>) -> GuardResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        self.overlay_json_str(&content).map_err(|e| match e {
            K6GuardError::Json(inner) => {
                K6GuardError::Config(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    /// 以当前配置为底，叠加JSON字符串中出现的项
    pub fn overlay_json_str(self, content: &str) -> GuardResult<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let mut builder = CustomConfigBuilder::from_config(self);
        if let Some(size) = file.max_script_size {
            builder = builder.max_script_size(size);
        }
        if let Some(vus) = file.max_vus {
            builder = builder.max_vus(vus);
        }
        builder.build()
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ValidatorConfig {
        ValidatorConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ValidatorConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有配置为基础继续定制
    pub fn from_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn max_script_size(mut self, size: usize) -> Self {
        self.config.max_script_size = size;
        self
    }

    pub fn max_vus(mut self, vus: u64) -> Self {
        self.config.max_vus = vus;
        self
    }

    /// 构建配置，拒绝为零或超过硬上限的取值
    pub fn build(self) -> GuardResult<ValidatorConfig> {
        let config = self.config;
        if config.max_script_size == 0 {
            return Err(K6GuardError::Config("max_script_size must be greater than zero".to_string()));
        }
        if config.max_script_size > HARD_MAX_SCRIPT_SIZE {
            return Err(K6GuardError::Config(format!(
                "max_script_size {} exceeds hard limit {}",
                config.max_script_size, HARD_MAX_SCRIPT_SIZE
            )));
        }
        if config.max_vus == 0 {
            return Err(K6GuardError::Config("max_vus must be greater than zero".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.max_script_size, 51_200);
        assert_eq!(config.max_vus, 500);
    }

    #[test]
    fn test_builder_rejects_invalid_limits() {
        assert!(ConfigManager::custom().max_script_size(0).build().is_err());
        assert!(ConfigManager::custom().max_vus(0).build().is_err());
        assert!(ConfigManager::custom().max_script_size(HARD_MAX_SCRIPT_SIZE + 1).build().is_err());

        let config = ConfigManager::custom().max_script_size(1024).max_vus(10).build().unwrap();
        assert_eq!(config.max_script_size, 1024);
        assert_eq!(config.max_vus, 10);
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [(ENV_MAX_VUS, " 250 ")].into_iter().collect();
        let config = ValidatorConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.max_vus, 250);
        assert_eq!(config.max_script_size, DEFAULT_MAX_SCRIPT_SIZE);

        let bad: HashMap<&str, &str> = [(ENV_MAX_SCRIPT_SIZE, "lots")].into_iter().collect();
        let err = ValidatorConfig::from_lookup(|k| bad.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(matches!(err, K6GuardError::Config(_)));
    }

    #[test]
    fn test_from_json_str() {
        let config = ValidatorConfig::from_json_str(r#"{"max_vus": 100}"#).unwrap();
        assert_eq!(config.max_vus, 100);
        assert_eq!(config.max_script_size, DEFAULT_MAX_SCRIPT_SIZE);

        assert!(ValidatorConfig::from_json_str(r#"{"max_vus": "many"}"#).is_err());
        assert!(ValidatorConfig::from_json_str(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn test_json_overlays_environment() {
        let env: HashMap<&str, &str> = [(ENV_MAX_VUS, "250"), (ENV_MAX_SCRIPT_SIZE, "4096")].into_iter().collect();
        let base = ValidatorConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        let config = base.overlay_json_str(r#"{"max_script_size": 1024}"#).unwrap();
        assert_eq!(config.max_script_size, 1024);
        assert_eq!(config.max_vus, 250);

        assert_eq!(base.overlay_json_str("{}").unwrap(), base);
        assert!(base.overlay_json_str(r#"{"max_vus": 0}"#).is_err());
    }

    #[test]
    fn test_overlay_json_file() {
        let path = std::env::temp_dir().join(format!("k6guard-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"max_vus": 42}"#).unwrap();

        let base = ConfigManager::custom().max_script_size(2048).build().unwrap();
        let config = base.overlay_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.max_vus, 42);
        assert_eq!(config.max_script_size, 2048);
        assert!(matches!(base.overlay_json_file(&path), Err(K6GuardError::Io(_))));
    }
}
