use chrono::Local;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
// 统一日志管理模块
// 基于 env_logger，控制台输出到 stderr，可选追加写入日志文件
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default = "default_console_output")]
    pub console_output: bool,
    /// 同时写入 {root_dir}/journal_{YYYYMMDD}.log
    #[serde(default)]
    pub file_output: bool,
}

fn default_root_dir() -> String {
    "logs".to_string()
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_console_output() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            default_level: default_level(),
            console_output: default_console_output(),
            file_output: false,
        }
    }
}

impl LogConfig {
    /// 获取日志级别
    pub fn level_filter(&self) -> LevelFilter {
        match self.default_level.to_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "TRACE" => LevelFilter::Trace,
            "DEBUG" => LevelFilter::Debug,
            "INFO" => LevelFilter::Info,
            "WARN" => LevelFilter::Warn,
            "ERROR" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }
}

/// 同时写入两个目标，用于控制台 + 日志文件
pub struct Tee<A: Write, B: Write> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// 获取当天的日志文件路径
pub fn get_log_path(config: &LogConfig) -> PathBuf {
    let date = Local::now().format("%Y%m%d");
    Path::new(&config.root_dir).join(format!("journal_{}.log", date))
}

/// 初始化全局日志，返回日志文件路径（未开启文件输出时为 None）
///
/// RUST_LOG 优先于配置中的级别。
pub fn init_logger(config: &LogConfig) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let level = config.level_filter().to_string();
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] [{}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let mut log_path = None;
    if config.file_output {
        fs::create_dir_all(&config.root_dir)?;
        let path = get_log_path(config);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        if config.console_output {
            let tee = Tee::new(io::stderr(), file);
            builder.target(env_logger::Target::Pipe(Box::new(tee)));
        } else {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        log_path = Some(path);
    } else if !config.console_output {
        builder.filter_level(LevelFilter::Off);
    }

    builder.try_init()?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_parsing() {
        let mut config = LogConfig::default();
        assert_eq!(config.level_filter(), LevelFilter::Info);
        config.default_level = "debug".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        config.default_level = "verbose".to_string();
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_tee_writes_both_targets() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        writeln!(tee, "[INFO] 📒 已创建交易记录文件").unwrap();
        tee.flush().unwrap();

        let (console, file) = tee.into_inner();
        assert_eq!(console, file);
        assert_eq!(
            String::from_utf8(console).unwrap(),
            "[INFO] 📒 已创建交易记录文件\n"
        );
    }

    #[test]
    fn test_log_path_naming() {
        let config = LogConfig {
            root_dir: "var/log".to_string(),
            ..LogConfig::default()
        };
        let path = get_log_path(&config);
        assert!(path.starts_with("var/log"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("journal_") && name.ends_with(".log"));
    }
}

// 日志文件命名规范：
// - 日志: {root_dir}/journal_{YYYYMMDD}.log
