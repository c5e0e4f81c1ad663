use crate::core::config::{JournalConfig, StoreConfig, DEFAULT_STORE_FILE};
use crate::core::error::JournalError;
use crate::utils::unified_logger::LogConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 创建默认配置
pub fn create_default_config() -> JournalConfig {
    JournalConfig {
        store: StoreConfig {
            path: PathBuf::from(DEFAULT_STORE_FILE),
            create_if_missing: true,
        },
        log: LogConfig::default(),
    }
}

/// 将默认配置写出为YAML，文件已存在时不覆盖
pub fn write_default_config(path: &Path) -> Result<bool, JournalError> {
    if path.exists() {
        return Ok(false);
    }

    let yaml = serde_yaml::to_string(&create_default_config())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| JournalError::ConfigError(format!("创建配置目录失败: {}", e)))?;
    }
    fs::write(path, yaml)
        .map_err(|e| JournalError::ConfigError(format!("写入配置文件失败: {}", e)))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_roundtrips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/journal.yml");

        assert!(write_default_config(&path).unwrap());
        assert!(!write_default_config(&path).unwrap());

        let loaded = JournalConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.store.path, PathBuf::from(DEFAULT_STORE_FILE));
        assert_eq!(loaded.log.default_level, "INFO");
        assert_eq!(
            create_default_config().log.level_filter(),
            LogConfig::default().level_filter()
        );
    }
}
