use crate::core::error::{JournalError, Result};
use crate::core::query::QueryEngine;
use crate::core::traits::RecordStore;
use crate::core::types::{FieldName, StoredRow, TradeKey, TradeRecord, HEDGE_PLACEHOLDER};
use crate::form::fields::{NewTradeForm, UpdateForm};

/// 表单控制器：校验通过后再交给存储写入
///
/// 无内部状态，每次调用都重新读取文件。校验失败时不会发生任何写入。
pub struct FormController<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> FormController<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn queries(&self) -> QueryEngine<'_, S> {
        QueryEngine::new(self.store)
    }

    /// 校验新增交易，返回待写入的记录
    pub fn validate_new(&self, form: &NewTradeForm) -> Result<TradeRecord> {
        for field in FieldName::ALL.iter().filter(|f| f.is_always_required()) {
            if form.get(*field).is_empty() {
                return Err(JournalError::MissingField(field.label().to_string()));
            }
        }

        let key = form.key();
        if self
            .queries()
            .find_by_key(&key.strategy, &key.date, &key.instrument)?
            .is_some()
        {
            return Err(JournalError::duplicate(&key));
        }

        let hedged = form.is_hedged();
        if hedged {
            if let Some(missing) = FieldName::HEDGE.iter().find(|f| form.get(**f).is_empty()) {
                return Err(JournalError::MissingField(missing.label().to_string()));
            }
        }

        let mut record = TradeRecord::default();
        for field in FieldName::ALL {
            if field.is_hedge() && !hedged {
                record.set_field(field, HEDGE_PLACEHOLDER);
            } else {
                record.set_field(field, form.get(field));
            }
        }
        Ok(record)
    }

    /// 新增交易
    pub fn add_trade(&self, form: &NewTradeForm) -> Result<TradeRecord> {
        let record = match self.validate_new(form) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("新增交易被拒绝: {}", e);
                return Err(e);
            }
        };

        self.store.append(&record)?;
        log::info!("✅ 交易已添加: {}", record.key());
        Ok(record)
    }

    /// 校验修改，返回合并后的记录
    pub fn validate_update(
        &self,
        original_key: &TradeKey,
        changes: &UpdateForm,
    ) -> Result<TradeRecord> {
        self.prepare_update(original_key, changes)
            .map(|(_, updated)| updated)
    }

    /// 修改交易：读取全部行，合并后整体重写，无法解析的行原样保留
    pub fn update_trade(
        &self,
        original_key: &TradeKey,
        changes: &UpdateForm,
    ) -> Result<TradeRecord> {
        let (rows, updated) = match self.prepare_update(original_key, changes) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("修改交易被拒绝: {}", e);
                return Err(e);
            }
        };

        self.store.rewrite_rows(&rows)?;
        log::info!("✅ 交易已修改: {} -> {}", original_key.trimmed(), updated.key());
        Ok(updated)
    }

    fn prepare_update(
        &self,
        original_key: &TradeKey,
        changes: &UpdateForm,
    ) -> Result<(Vec<StoredRow>, TradeRecord)> {
        let key = original_key.trimmed();
        if !key.is_complete() {
            return Err(JournalError::MissingKey);
        }

        let mut rows = self.store.read_rows()?;
        let mut touched = Vec::new();
        let mut updated = None;

        for (idx, row) in rows.iter_mut().enumerate() {
            if let StoredRow::Trade(record) = row {
                if record.matches(&key) {
                    merge_on_blank(record, changes);
                    touched.push(idx);
                    updated.get_or_insert_with(|| record.clone());
                }
            }
        }

        let updated = updated.ok_or_else(|| JournalError::not_found(&key))?;

        let new_key = updated.key();
        if new_key != key {
            let collides = rows
                .iter()
                .enumerate()
                .any(|(idx, row)| !touched.contains(&idx) && row.matches(&new_key));
            if collides {
                return Err(JournalError::duplicate(&new_key));
            }
        }

        Ok((rows, updated))
    }

    /// 校验删除
    pub fn validate_delete(&self, key: &TradeKey) -> Result<()> {
        let key = key.trimmed();
        match self
            .queries()
            .find_by_key(&key.strategy, &key.date, &key.instrument)?
        {
            Some(_) => Ok(()),
            None => Err(JournalError::not_found(&key)),
        }
    }

    /// 删除交易，返回删除的条数
    pub fn delete_trade(&self, key: &TradeKey) -> Result<usize> {
        let key = key.trimmed();
        let rows = self.store.read_rows()?;
        let before = rows.len();
        let remaining: Vec<StoredRow> = rows.into_iter().filter(|r| !r.matches(&key)).collect();

        let removed = before - remaining.len();
        if removed == 0 {
            log::warn!("删除失败，交易不存在: {}", key);
            return Err(JournalError::not_found(&key));
        }

        self.store.rewrite_rows(&remaining)?;
        log::info!("🗑️ 交易已删除: {}", key);
        Ok(removed)
    }

    /// 清空全部交易，仅保留表头
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        log::info!("🧹 已清空全部交易记录");
        Ok(())
    }
}

/// 空白表示保留原值，不是清空
fn merge_on_blank(record: &mut TradeRecord, changes: &UpdateForm) {
    for field in FieldName::ALL {
        if let Some(value) = changes.change(field) {
            record.set_field(field, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CsvRecordStore;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, CsvRecordStore) {
        let dir = tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("trades.csv"));
        store.initialize().unwrap();
        (dir, store)
    }

    fn filled_form(strategy: &str) -> NewTradeForm {
        NewTradeForm::new()
            .with(FieldName::StrategyName, strategy)
            .with(FieldName::TradeDate, "2024-05-02")
            .with(FieldName::Instrument, "BANKNIFTY")
            .with(FieldName::StrikePrice, "48000")
            .with(FieldName::Side, "Sell")
            .with(FieldName::ExpiryDate, "2024-05-08")
            .with(FieldName::OptionType, "PE")
            .with(FieldName::Lots, "1")
            .with(FieldName::EntryPrice, "210")
            .with(FieldName::ExitPrice, "150")
            .with(FieldName::MarginUsed, "98000")
            .with(FieldName::HoldingPeriod, "3")
            .with(FieldName::ProfitLoss, "900")
            .with_hedged("n")
    }

    fn key(strategy: &str) -> TradeKey {
        TradeKey::new(strategy, "2024-05-02", "BANKNIFTY")
    }

    #[test]
    fn test_add_then_find() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);

        let record = controller.add_trade(&filled_form("Bull Put")).unwrap();
        let found = QueryEngine::new(&store)
            .find_by_key("Bull Put", "2024-05-02", "BANKNIFTY")
            .unwrap();
        assert_eq!(found, Some(record));
    }

    #[test]
    fn test_missing_required_field() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        let form = filled_form("Bull Put").with(FieldName::Lots, "  ");

        match controller.add_trade(&form) {
            Err(JournalError::MissingField(label)) => assert_eq!(label, "Lots"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_rejected_without_write() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("Bull Put")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = controller.add_trade(&filled_form("Bull Put")).unwrap_err();
        assert!(matches!(err, JournalError::DuplicateKey { .. }));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_unhedged_uses_placeholder() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        let form = filled_form("Naked Put")
            .with(FieldName::HedgeStrikePrice, "47000")
            .with(FieldName::HedgeSide, "Buy");

        let record = controller.add_trade(&form).unwrap();
        for field in FieldName::HEDGE {
            assert_eq!(record.field(field), HEDGE_PLACEHOLDER);
        }
        assert!(!record.is_hedged());
    }

    #[test]
    fn test_hedged_requires_all_hedge_fields() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        let form = filled_form("Spread")
            .with_hedged("Y")
            .with(FieldName::HedgeStrikePrice, "47000")
            .with(FieldName::HedgeSide, "Buy")
            .with(FieldName::HedgeEntryPrice, "60");

        match controller.validate_new(&form) {
            Err(JournalError::MissingField(label)) => assert_eq!(label, "Hedged Exit Price"),
            other => panic!("unexpected: {:?}", other),
        }

        let record = controller
            .add_trade(&form.with(FieldName::HedgeExitPrice, "40"))
            .unwrap();
        assert_eq!(record.hedge_exit_price, "40");
        assert!(record.is_hedged());
    }

    #[test]
    fn test_update_merge_on_blank() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("Bull Put")).unwrap();

        let changes = UpdateForm::new()
            .with(FieldName::Lots, "")
            .with(FieldName::ExitPrice, "   ")
            .with(FieldName::ProfitLoss, "-300");
        let updated = controller.update_trade(&key("Bull Put"), &changes).unwrap();

        assert_eq!(updated.lots, "1");
        assert_eq!(updated.exit_price, "150");
        assert_eq!(updated.profit_loss, "-300");
        assert_eq!(store.read_all().unwrap(), vec![updated]);
    }

    #[test]
    fn test_update_errors() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("A")).unwrap();
        controller.add_trade(&filled_form("B")).unwrap();

        let err = controller
            .validate_update(&TradeKey::new("A", "", "BANKNIFTY"), &UpdateForm::new())
            .unwrap_err();
        assert!(matches!(err, JournalError::MissingKey));

        let err = controller
            .validate_update(&key("Z"), &UpdateForm::new())
            .unwrap_err();
        assert!(matches!(err, JournalError::RecordNotFound { .. }));

        let before = fs::read(store.path()).unwrap();
        let rename = UpdateForm::new().with(FieldName::StrategyName, "B");
        let err = controller.update_trade(&key("A"), &rename).unwrap_err();
        assert!(matches!(err, JournalError::DuplicateKey { .. }));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_can_change_key() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("A")).unwrap();

        let rename = UpdateForm::new().with(FieldName::StrategyName, "A2");
        controller.update_trade(&key("A"), &rename).unwrap();

        let queries = QueryEngine::new(&store);
        assert!(queries.search(&key("A")).is_err());
        assert_eq!(queries.search(&key("A2")).unwrap().profit_loss, "900");
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("A")).unwrap();
        controller.add_trade(&filled_form("B")).unwrap();

        let before = fs::read(store.path()).unwrap();
        assert!(matches!(
            controller.validate_delete(&key("Z")),
            Err(JournalError::RecordNotFound { .. })
        ));
        assert!(matches!(
            controller.delete_trade(&key("Z")),
            Err(JournalError::RecordNotFound { .. })
        ));
        assert_eq!(fs::read(store.path()).unwrap(), before);

        controller.validate_delete(&key("A")).unwrap();
        assert_eq!(controller.delete_trade(&key("A")).unwrap(), 1);
        let remaining = store.read_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].strategy_name, "B");
    }

    #[test]
    fn test_update_and_delete_keep_unparsed_rows() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("A")).unwrap();

        let mut content = fs::read_to_string(store.path()).unwrap();
        content.push_str("legacy,row,with,too,few,fields\n");
        fs::write(store.path(), &content).unwrap();
        controller.add_trade(&filled_form("B")).unwrap();

        let changes = UpdateForm::new().with(FieldName::Lots, "9");
        controller.update_trade(&key("B"), &changes).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "legacy,row,with,too,few,fields");

        controller.delete_trade(&key("A")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "legacy,row,with,too,few,fields");

        let remaining = store.read_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].lots, "9");
    }

    #[test]
    fn test_clear_all() {
        let (_dir, store) = setup();
        let controller = FormController::new(&store);
        controller.add_trade(&filled_form("A")).unwrap();

        controller.clear_all().unwrap();
        assert!(store.read_all().unwrap().is_empty());
        assert!(controller.add_trade(&filled_form("A")).is_ok());
    }
}
