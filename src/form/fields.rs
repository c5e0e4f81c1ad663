use crate::core::types::{FieldName, TradeKey};
use std::collections::HashMap;

/// 新增交易表单
///
/// 未设置的字段视为空白，读取时去除首尾空白。
#[derive(Debug, Clone, Default)]
pub struct NewTradeForm {
    values: HashMap<FieldName, String>,
    /// 是否已对冲 (y/n)
    pub hedged: String,
}

impl NewTradeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_hedged(mut self, hedged: impl Into<String>) -> Self {
        self.hedged = hedged.into();
        self
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map(|v| v.trim()).unwrap_or("")
    }

    /// 对冲标记为 y（不区分大小写）
    pub fn is_hedged(&self) -> bool {
        self.hedged.trim().eq_ignore_ascii_case("y")
    }

    pub fn key(&self) -> TradeKey {
        TradeKey::new(
            self.get(FieldName::StrategyName),
            self.get(FieldName::TradeDate),
            self.get(FieldName::Instrument),
        )
    }
}

/// 修改交易表单：空白字段表示保留原值
#[derive(Debug, Clone, Default)]
pub struct UpdateForm {
    values: HashMap<FieldName, String>,
}

impl UpdateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// 非空白的修改值
    pub fn change(&self, field: FieldName) -> Option<&str> {
        self.values
            .get(&field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        FieldName::ALL.iter().all(|f| self.change(*f).is_none())
    }
}
