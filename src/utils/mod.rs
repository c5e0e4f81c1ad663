// 工具模块 - 配置、日志与输出格式
pub mod default_config;
pub mod report;
pub mod unified_logger;

pub use default_config::{create_default_config, write_default_config};
pub use report::{render_record, render_summary, render_table};
pub use unified_logger::{get_log_path, init_logger, LogConfig};
