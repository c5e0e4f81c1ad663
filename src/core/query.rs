use crate::core::error::{JournalError, Result};
use crate::core::traits::RecordStore;
use crate::core::types::{TradeKey, TradeRecord, TradeSummary};

/// 查询引擎：主键查找与汇总统计，均基于一次完整扫描
pub struct QueryEngine<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> QueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 按复合主键查找，存在重复时返回文件中的第一条
    pub fn find_by_key(
        &self,
        strategy: &str,
        date: &str,
        instrument: &str,
    ) -> Result<Option<TradeRecord>> {
        let key = TradeKey::new(strategy, date, instrument);
        Ok(self
            .store
            .read_all()?
            .into_iter()
            .find(|record| record.matches(&key)))
    }

    /// 查找交易，主键不完整或未找到时返回错误
    pub fn search(&self, key: &TradeKey) -> Result<TradeRecord> {
        let key = key.trimmed();
        if !key.is_complete() {
            return Err(JournalError::MissingKey);
        }

        self.find_by_key(&key.strategy, &key.date, &key.instrument)?
            .ok_or_else(|| JournalError::not_found(&key))
    }

    pub fn list(&self) -> Result<Vec<TradeRecord>> {
        self.store.read_all()
    }

    /// 汇总：总笔数、总盈亏、盈利/亏损笔数
    pub fn aggregate(&self) -> Result<TradeSummary> {
        Ok(summarize(&self.store.read_all()?))
    }
}

/// 盈亏为零或无法解析的记录只计入总笔数
pub fn summarize(records: &[TradeRecord]) -> TradeSummary {
    let mut summary = TradeSummary::default();

    for record in records {
        summary.total_trades += 1;
        if let Some(pnl) = record.pnl() {
            summary.total_pnl += pnl;
            if pnl > 0.0 {
                summary.winning_trades += 1;
            } else if pnl < 0.0 {
                summary.losing_trades += 1;
            }
        }
    }

    summary
}
