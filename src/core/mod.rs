// 核心模块 - 记录存储与查询
pub mod config;
pub mod error;
pub mod query;
pub mod store;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use query::{summarize, QueryEngine};
pub use store::CsvRecordStore;
pub use traits::RecordStore;
pub use types::{
    header_row, FieldName, StoredRow, TradeKey, TradeRecord, TradeSummary, FIELD_COUNT, HEDGE_PLACEHOLDER,
};
