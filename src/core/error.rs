use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("缺少必填字段: {0}")]
    MissingField(String),

    #[error("交易已存在: {strategy} / {date} / {instrument}")]
    DuplicateKey {
        strategy: String,
        date: String,
        instrument: String,
    },

    #[error("交易未找到: {strategy} / {date} / {instrument}")]
    RecordNotFound {
        strategy: String,
        date: String,
        instrument: String,
    },

    #[error("缺少主键字段: 策略名称、交易日期、标的均不能为空")]
    MissingKey,

    #[error("存储不可用: {0}")]
    StoreUnavailable(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for JournalError {
    fn from(e: std::io::Error) -> Self {
        JournalError::StoreUnavailable(e.to_string())
    }
}

impl From<csv::Error> for JournalError {
    fn from(e: csv::Error) -> Self {
        JournalError::StoreUnavailable(e.to_string())
    }
}

impl From<serde_yaml::Error> for JournalError {
    fn from(e: serde_yaml::Error) -> Self {
        JournalError::ConfigError(e.to_string())
    }
}

impl JournalError {
    pub(crate) fn duplicate(key: &crate::core::types::TradeKey) -> Self {
        JournalError::DuplicateKey {
            strategy: key.strategy.clone(),
            date: key.date.clone(),
            instrument: key.instrument.clone(),
        }
    }

    pub(crate) fn not_found(key: &crate::core::types::TradeKey) -> Self {
        JournalError::RecordNotFound {
            strategy: key.strategy.clone(),
            date: key.date.clone(),
            instrument: key.instrument.clone(),
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            JournalError::MissingField(_)
            | JournalError::MissingKey
            | JournalError::DuplicateKey { .. }
            | JournalError::RecordNotFound { .. } => ErrorSeverity::Warning,
            JournalError::StoreUnavailable(_) | JournalError::ConfigError(_) => {
                ErrorSeverity::Error
            }
        }
    }

    /// 获取用户友好的错误描述
    pub fn user_message(&self) -> String {
        match self {
            JournalError::MissingField(field) => format!("'{}' is required.", field),
            JournalError::DuplicateKey { .. } => {
                "Trade with same Strategy Name, Trade Date, and Instrument already exists."
                    .to_string()
            }
            JournalError::RecordNotFound { .. } => "Specified trade does not exist.".to_string(),
            JournalError::MissingKey => {
                "Please enter Strategy Name, Trade Date, and Instrument.".to_string()
            }
            JournalError::StoreUnavailable(reason) => {
                format!("Trade file is not accessible: {}", reason)
            }
            JournalError::ConfigError(reason) => format!("Invalid configuration: {}", reason),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Warning, // 用户输入问题，修正后重试，存储不受影响
    Error,   // 存储或配置不可用
}

pub type Result<T> = std::result::Result<T, JournalError>;
