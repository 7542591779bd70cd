// ==========================================
// SNAC 数据上传工具 - 配置加载
// ==========================================
// 职责: 读取环境列表、当前环境、API Key、预览/输出选项
// 来源优先级: 环境变量 > 配置文件 > 内置默认值
// 红线: 只读，不回写配置
// ==========================================

use crate::config::environment::{SnacEnvironment, DEV_ENVIRONMENT_ID};
use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "SNAC_UPLOADER_CONFIG";
/// API Key 环境变量
pub const API_KEY_ENV: &str = "SNAC_API_KEY";
/// 结果台账路径环境变量
pub const LEDGER_PATH_ENV: &str = "SNAC_UPLOADER_DB_PATH";

pub const DEFAULT_MAX_PREVIEW_RECORDS: usize = 10;

// ==========================================
// UploaderConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// 当前环境 ID
    pub environment: String,

    /// 可选环境（内置 dev / prod，可覆盖）
    pub environments: Vec<SnacEnvironment>,

    /// 全局 API Key（环境自身未设置时使用）
    pub api_key: Option<String>,

    /// 输出结果中是否包含原始 API 响应列
    pub include_api_response: bool,

    /// 预览最多评估的记录数
    pub max_preview_records: usize,

    /// HTTP 请求超时（秒），None 表示不设超时
    pub request_timeout_secs: Option<u64>,

    /// 上传结果台账（SQLite）路径
    pub ledger_path: Option<String>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            environment: DEV_ENVIRONMENT_ID.to_string(),
            environments: vec![SnacEnvironment::development(), SnacEnvironment::production()],
            api_key: None,
            include_api_response: false,
            max_preview_records: DEFAULT_MAX_PREVIEW_RECORDS,
            request_timeout_secs: None,
            ledger_path: None,
        }
    }
}

impl UploaderConfig {
    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式指定的配置文件（不存在时报错）
    ///
    /// # 说明
    /// - 未显式指定时依次尝试 SNAC_UPLOADER_CONFIG 与用户配置目录
    /// - 默认位置不存在配置文件时使用内置默认值
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::FileNotFound(p.display().to_string()));
                }
                Self::from_file(p)?
            }
            None => match Self::default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("未找到配置文件，使用默认配置");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "读取配置文件");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir().map(|d| d.join("snac-uploader").join("config.json"))
    }

    /// 环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let trimmed = key.trim();
            if !trimmed.is_empty() {
                self.api_key = Some(trimmed.to_string());
            }
        }

        if let Ok(path) = std::env::var(LEDGER_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                self.ledger_path = Some(trimmed.to_string());
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_preview_records == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_preview_records".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 当前环境（不区分大小写匹配 ID）
    pub fn current_environment(&self) -> ConfigResult<SnacEnvironment> {
        self.environment_by_id(&self.environment)
    }

    pub fn environment_by_id(&self, id: &str) -> ConfigResult<SnacEnvironment> {
        let mut env = self
            .environments
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(id.trim()))
            .cloned()
            .ok_or_else(|| ConfigError::UnknownEnvironment(id.to_string()))?;

        if env.api_key.is_empty() {
            if let Some(key) = &self.api_key {
                env.api_key = key.clone();
            }
        }

        Ok(env)
    }

    /// 结果台账路径
    ///
    /// 未配置时使用用户数据目录，目录不可用时回退到当前目录
    pub fn ledger_path(&self) -> String {
        if let Some(path) = &self.ledger_path {
            return path.clone();
        }

        let mut path = PathBuf::from("./snac_uploader_outcomes.db");
        if let Some(data_dir) = dirs::data_dir() {
            let dir = data_dir.join("snac-uploader");
            if fs::create_dir_all(&dir).is_ok() {
                path = dir.join("outcomes.db");
            }
        }

        path.to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = UploaderConfig::default();
        assert_eq!(config.environment, "dev");
        assert_eq!(config.max_preview_records, 10);
        assert!(!config.include_api_response);

        let env = config.current_environment().unwrap();
        assert_eq!(env.name, "Development");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = UploaderConfig::from_json_str(
            r#"{"environment":"prod","api_key":"secret","include_api_response":true}"#,
        )
        .unwrap();

        assert_eq!(config.environments.len(), 2);
        assert_eq!(config.max_preview_records, 10);

        let env = config.current_environment().unwrap();
        assert!(env.is_prod());
        assert_eq!(env.api_key, "secret");
    }

    #[test]
    fn test_environment_own_key_wins() {
        let mut config = UploaderConfig::default();
        config.api_key = Some("global".to_string());
        config.environments[0].api_key = "dev-key".to_string();

        assert_eq!(config.environment_by_id("DEV").unwrap().api_key, "dev-key");
        assert_eq!(config.environment_by_id("prod").unwrap().api_key, "global");
    }

    #[test]
    fn test_unknown_environment() {
        let mut config = UploaderConfig::default();
        config.environment = "staging".to_string();
        assert!(matches!(
            config.current_environment(),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"max_preview_records": 3, "request_timeout_secs": 30}}"#).unwrap();

        let config = UploaderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.max_preview_records, 3);
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = UploaderConfig::load(Some(Path::new("/nonexistent/snac/config.json")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_preview_limit() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"max_preview_records": 0}}"#).unwrap();

        let result = UploaderConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
