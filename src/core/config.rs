use crate::core::error::JournalError;
use crate::utils::unified_logger::LogConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// 默认交易记录文件
pub const DEFAULT_STORE_FILE: &str = "option_selling_tracker.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// 打开时若文件不存在则写入表头
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
            create_if_missing: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl JournalConfig {
    /// 从YAML文件加载配置
    pub fn from_file(path: &str) -> Result<Self, JournalError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| JournalError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        let config: JournalConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// 覆盖交易记录文件路径
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.path = path.into();
        self
    }
}
