use crate::core::error::Result;
use crate::core::types::{StoredRow, TradeRecord};

/// 交易记录存储，唯一直接读写持久化数据的组件
///
/// 不做并发保护：同一时刻只能有一个写入方。
pub trait RecordStore {
    /// 文件不存在或为空时写入表头，已有内容则不做任何事
    fn initialize(&self) -> Result<()>;

    /// 追加一条记录，唯一性由调用方保证
    fn append(&self, record: &TradeRecord) -> Result<()>;

    /// 按文件顺序读取全部行（不含表头），无法解析的行以原始形式返回
    fn read_rows(&self) -> Result<Vec<StoredRow>>;

    /// 以表头 + 给定行整体替换存储内容
    fn rewrite_rows(&self, rows: &[StoredRow]) -> Result<()>;

    /// 按文件顺序读取全部记录，跳过无法解析的行
    fn read_all(&self) -> Result<Vec<TradeRecord>> {
        Ok(self
            .read_rows()?
            .into_iter()
            .filter_map(StoredRow::into_trade)
            .collect())
    }

    /// 以表头 + 给定记录整体替换存储内容
    fn rewrite_all(&self, records: &[TradeRecord]) -> Result<()> {
        let rows: Vec<StoredRow> = records.iter().cloned().map(StoredRow::Trade).collect();
        self.rewrite_rows(&rows)
    }

    fn clear(&self) -> Result<()> {
        self.rewrite_rows(&[])
    }
}
