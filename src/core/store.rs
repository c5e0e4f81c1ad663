use crate::core::error::{JournalError, Result};
use crate::core::traits::RecordStore;
use crate::core::types::{header_row, StoredRow, TradeRecord, FIELD_COUNT};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// CSV文件存储
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 按配置打开存储，需要时初始化文件
    pub fn open(config: &crate::core::config::StoreConfig) -> Result<Self> {
        let store = Self::new(&config.path);
        if config.create_if_missing {
            store.initialize()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                JournalError::StoreUnavailable(format!("文件名非法: {}", self.path.display()))
            })?;
        Ok(self.parent_dir().join(format!("{}.tmp", file_name)))
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn write_file(&self, path: &Path, rows: &[StoredRow]) -> Result<()> {
        // 保留下来的异常行字段数不定
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        writer.write_record(header_row())?;
        for row in rows {
            match row {
                StoredRow::Trade(record) => writer.write_record(record.to_fields())?,
                StoredRow::Unparsed(raw) => writer.write_byte_record(raw)?,
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn is_empty_file(&self) -> Result<bool> {
        Ok(fs::metadata(&self.path)?.len() == 0)
    }
}

/// 字段数正确且全部为合法UTF-8时解析为交易记录
fn parse_row(raw: &csv::ByteRecord) -> Option<TradeRecord> {
    if raw.len() != FIELD_COUNT {
        return None;
    }
    let fields: Vec<&str> = raw
        .iter()
        .map(std::str::from_utf8)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    TradeRecord::from_fields(fields)
}

impl RecordStore for CsvRecordStore {
    fn initialize(&self) -> Result<()> {
        if self.path.exists() && !self.is_empty_file()? {
            return Ok(());
        }

        fs::create_dir_all(self.parent_dir())?;
        self.write_file(&self.path, &[])?;
        log::info!("📒 已创建交易记录文件: {}", self.path.display());
        Ok(())
    }

    fn append(&self, record: &TradeRecord) -> Result<()> {
        self.initialize()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(record.to_fields())?;
        writer.flush()?;

        log::debug!("追加交易记录: {}", record.key());
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<StoredRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for (line, raw) in reader.byte_records().enumerate() {
            let raw = raw?;
            match parse_row(&raw) {
                Some(record) => rows.push(StoredRow::Trade(record)),
                None => {
                    log::warn!(
                        "⚠️ 跳过第{}条记录: 字段数 {} (应为 {}) 或编码非UTF-8",
                        line + 1,
                        raw.len(),
                        FIELD_COUNT
                    );
                    rows.push(StoredRow::Unparsed(raw));
                }
            }
        }

        Ok(rows)
    }

    fn rewrite_rows(&self, rows: &[StoredRow]) -> Result<()> {
        fs::create_dir_all(self.parent_dir())?;
        let tmp_path = self.tmp_path()?;

        if let Err(e) = self.write_file(&tmp_path, rows) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        fs::rename(&tmp_path, &self.path)?;

        log::debug!(
            "重写交易记录文件: {} ({}行)",
            self.path.display(),
            rows.len()
        );
        Ok(())
    }
}
