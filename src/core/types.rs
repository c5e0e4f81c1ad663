use serde::{Deserialize, Serialize};
use std::fmt;

/// 每行固定字段数
pub const FIELD_COUNT: usize = 17;

/// 未对冲交易的对冲字段占位符
pub const HEDGE_PLACEHOLDER: &str = "-";

/// 交易记录表的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    StrategyName,
    TradeDate,
    Instrument,
    StrikePrice,
    Side,
    ExpiryDate,
    OptionType,
    Lots,
    EntryPrice,
    ExitPrice,
    HedgeStrikePrice,
    HedgeSide,
    HedgeEntryPrice,
    HedgeExitPrice,
    MarginUsed,
    HoldingPeriod,
    ProfitLoss,
}

impl FieldName {
    /// 文件中的列顺序
    pub const ALL: [FieldName; FIELD_COUNT] = [
        FieldName::StrategyName,
        FieldName::TradeDate,
        FieldName::Instrument,
        FieldName::StrikePrice,
        FieldName::Side,
        FieldName::ExpiryDate,
        FieldName::OptionType,
        FieldName::Lots,
        FieldName::EntryPrice,
        FieldName::ExitPrice,
        FieldName::HedgeStrikePrice,
        FieldName::HedgeSide,
        FieldName::HedgeEntryPrice,
        FieldName::HedgeExitPrice,
        FieldName::MarginUsed,
        FieldName::HoldingPeriod,
        FieldName::ProfitLoss,
    ];

    pub const HEDGE: [FieldName; 4] = [
        FieldName::HedgeStrikePrice,
        FieldName::HedgeSide,
        FieldName::HedgeEntryPrice,
        FieldName::HedgeExitPrice,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// CSV表头
    pub fn header(self) -> &'static str {
        match self {
            FieldName::StrategyName => "Strategy_Name",
            FieldName::TradeDate => "Trade_Date",
            FieldName::Instrument => "Instrument",
            FieldName::StrikePrice => "Strike_Price",
            FieldName::Side => "Buy/Sell",
            FieldName::ExpiryDate => "Expiry_Date",
            FieldName::OptionType => "Type",
            FieldName::Lots => "Lots",
            FieldName::EntryPrice => "Entry_Price",
            FieldName::ExitPrice => "Exit_Price",
            FieldName::HedgeStrikePrice => "Hedged_Strike_Price",
            FieldName::HedgeSide => "Hedged_Buy/Sell",
            FieldName::HedgeEntryPrice => "Hedged_Entry_Price",
            FieldName::HedgeExitPrice => "Hedged_Exit_Price",
            FieldName::MarginUsed => "Margin_Used",
            FieldName::HoldingPeriod => "Holding_Period",
            FieldName::ProfitLoss => "P&L",
        }
    }

    /// 录入表单上的标签，校验失败时展示给用户
    pub fn label(self) -> &'static str {
        match self {
            FieldName::StrategyName => "Strategy Name",
            FieldName::TradeDate => "Trade Date (YYYY-MM-DD)",
            FieldName::Instrument => "Instrument",
            FieldName::StrikePrice => "Strike Price",
            FieldName::Side => "Buy/Sell",
            FieldName::ExpiryDate => "Expiry Date (YYYY-MM-DD)",
            FieldName::OptionType => "Type (CE/PE)",
            FieldName::Lots => "Lots",
            FieldName::EntryPrice => "Entry Price",
            FieldName::ExitPrice => "Exit Price",
            FieldName::HedgeStrikePrice => "Hedged Strike Price",
            FieldName::HedgeSide => "Hedged Buy/Sell",
            FieldName::HedgeEntryPrice => "Hedged Entry Price",
            FieldName::HedgeExitPrice => "Hedged Exit Price",
            FieldName::MarginUsed => "Margin Used",
            FieldName::HoldingPeriod => "Holding Period (Days)",
            FieldName::ProfitLoss => "P&L",
        }
    }

    pub fn is_hedge(self) -> bool {
        Self::HEDGE.contains(&self)
    }

    /// 新增交易时必填（共13个，对冲字段除外）
    pub fn is_always_required(self) -> bool {
        !self.is_hedge()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// 表头行
pub fn header_row() -> Vec<&'static str> {
    FieldName::ALL.iter().map(|f| f.header()).collect()
}

/// 复合主键：策略名称 + 交易日期 + 标的
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeKey {
    pub strategy: String,
    pub date: String,
    pub instrument: String,
}

impl TradeKey {
    pub fn new(
        strategy: impl Into<String>,
        date: impl Into<String>,
        instrument: impl Into<String>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            date: date.into(),
            instrument: instrument.into(),
        }
    }

    /// 去除首尾空白后的主键
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.strategy.trim(),
            self.date.trim(),
            self.instrument.trim(),
        )
    }

    pub fn is_complete(&self) -> bool {
        !self.strategy.is_empty() && !self.date.is_empty() && !self.instrument.is_empty()
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.strategy, self.date, self.instrument)
    }
}

/// 一条期权交易记录，所有字段按文本保存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Strategy_Name")]
    pub strategy_name: String,
    #[serde(rename = "Trade_Date")]
    pub trade_date: String,
    #[serde(rename = "Instrument")]
    pub instrument: String,
    #[serde(rename = "Strike_Price")]
    pub strike_price: String,
    #[serde(rename = "Buy/Sell")]
    pub side: String,
    #[serde(rename = "Expiry_Date")]
    pub expiry_date: String,
    #[serde(rename = "Type")]
    pub option_type: String,
    #[serde(rename = "Lots")]
    pub lots: String,
    #[serde(rename = "Entry_Price")]
    pub entry_price: String,
    #[serde(rename = "Exit_Price")]
    pub exit_price: String,
    #[serde(rename = "Hedged_Strike_Price")]
    pub hedge_strike_price: String,
    #[serde(rename = "Hedged_Buy/Sell")]
    pub hedge_side: String,
    #[serde(rename = "Hedged_Entry_Price")]
    pub hedge_entry_price: String,
    #[serde(rename = "Hedged_Exit_Price")]
    pub hedge_exit_price: String,
    #[serde(rename = "Margin_Used")]
    pub margin_used: String,
    #[serde(rename = "Holding_Period")]
    pub holding_period: String,
    #[serde(rename = "P&L")]
    pub profit_loss: String,
}

impl TradeRecord {
    /// 从一行字段构造，字段数不符时返回 None
    pub fn from_fields<I, S>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = fields.into_iter().map(Into::into).collect();
        let values: [String; FIELD_COUNT] = values.try_into().ok()?;
        let [strategy_name, trade_date, instrument, strike_price, side, expiry_date, option_type, lots, entry_price, exit_price, hedge_strike_price, hedge_side, hedge_entry_price, hedge_exit_price, margin_used, holding_period, profit_loss] =
            values;

        Some(Self {
            strategy_name,
            trade_date,
            instrument,
            strike_price,
            side,
            expiry_date,
            option_type,
            lots,
            entry_price,
            exit_price,
            hedge_strike_price,
            hedge_side,
            hedge_entry_price,
            hedge_exit_price,
            margin_used,
            holding_period,
            profit_loss,
        })
    }

    /// 按表头顺序输出字段
    pub fn to_fields(&self) -> Vec<&str> {
        FieldName::ALL.iter().map(|f| self.field(*f)).collect()
    }

    pub fn field(&self, name: FieldName) -> &str {
        match name {
            FieldName::StrategyName => &self.strategy_name,
            FieldName::TradeDate => &self.trade_date,
            FieldName::Instrument => &self.instrument,
            FieldName::StrikePrice => &self.strike_price,
            FieldName::Side => &self.side,
            FieldName::ExpiryDate => &self.expiry_date,
            FieldName::OptionType => &self.option_type,
            FieldName::Lots => &self.lots,
            FieldName::EntryPrice => &self.entry_price,
            FieldName::ExitPrice => &self.exit_price,
            FieldName::HedgeStrikePrice => &self.hedge_strike_price,
            FieldName::HedgeSide => &self.hedge_side,
            FieldName::HedgeEntryPrice => &self.hedge_entry_price,
            FieldName::HedgeExitPrice => &self.hedge_exit_price,
            FieldName::MarginUsed => &self.margin_used,
            FieldName::HoldingPeriod => &self.holding_period,
            FieldName::ProfitLoss => &self.profit_loss,
        }
    }

    pub fn set_field(&mut self, name: FieldName, value: impl Into<String>) {
        let slot = match name {
            FieldName::StrategyName => &mut self.strategy_name,
            FieldName::TradeDate => &mut self.trade_date,
            FieldName::Instrument => &mut self.instrument,
            FieldName::StrikePrice => &mut self.strike_price,
            FieldName::Side => &mut self.side,
            FieldName::ExpiryDate => &mut self.expiry_date,
            FieldName::OptionType => &mut self.option_type,
            FieldName::Lots => &mut self.lots,
            FieldName::EntryPrice => &mut self.entry_price,
            FieldName::ExitPrice => &mut self.exit_price,
            FieldName::HedgeStrikePrice => &mut self.hedge_strike_price,
            FieldName::HedgeSide => &mut self.hedge_side,
            FieldName::HedgeEntryPrice => &mut self.hedge_entry_price,
            FieldName::HedgeExitPrice => &mut self.hedge_exit_price,
            FieldName::MarginUsed => &mut self.margin_used,
            FieldName::HoldingPeriod => &mut self.holding_period,
            FieldName::ProfitLoss => &mut self.profit_loss,
        };
        *slot = value.into();
    }

    pub fn key(&self) -> TradeKey {
        TradeKey::new(&self.strategy_name, &self.trade_date, &self.instrument)
    }

    pub fn matches(&self, key: &TradeKey) -> bool {
        self.strategy_name == key.strategy
            && self.trade_date == key.date
            && self.instrument == key.instrument
    }

    /// 对冲字段非占位符即视为已对冲
    pub fn is_hedged(&self) -> bool {
        FieldName::HEDGE
            .iter()
            .any(|f| self.field(*f) != HEDGE_PLACEHOLDER)
    }

    /// 可解析的盈亏数值
    pub fn pnl(&self) -> Option<f64> {
        self.profit_loss
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// 文件中的一行
///
/// 字段数不符或无法按UTF-8解码的行保留原始字节，重写时原样写回。
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRow {
    Trade(TradeRecord),
    Unparsed(csv::ByteRecord),
}

impl StoredRow {
    pub fn trade(&self) -> Option<&TradeRecord> {
        match self {
            StoredRow::Trade(record) => Some(record),
            StoredRow::Unparsed(_) => None,
        }
    }

    pub fn into_trade(self) -> Option<TradeRecord> {
        match self {
            StoredRow::Trade(record) => Some(record),
            StoredRow::Unparsed(_) => None,
        }
    }

    /// 是否为匹配主键的交易记录
    pub fn matches(&self, key: &TradeKey) -> bool {
        self.trade().is_some_and(|record| record.matches(key))
    }
}

/// 汇总统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub total_pnl: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
}
