use crate::core::types::{header_row, FieldName, TradeRecord, TradeSummary};
use std::fmt::Write;

/// 汇总行，与记录表一起展示
pub fn render_summary(summary: &TradeSummary) -> String {
    format!(
        "Total Trades: {} | Total P&L: {:.2} | Winning Trades: {} | Losing Trades: {}",
        summary.total_trades, summary.total_pnl, summary.winning_trades, summary.losing_trades
    )
}

/// 单条记录，每行 `表头: 值`
pub fn render_record(record: &TradeRecord) -> String {
    let mut out = String::new();
    for field in FieldName::ALL {
        let _ = writeln!(out, "{}: {}", field.header(), record.field(field));
    }
    out
}

/// 记录表，列宽按内容自适应
pub fn render_table(records: &[TradeRecord]) -> String {
    let header = header_row();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for record in records {
        for (i, value) in record.to_fields().iter().enumerate() {
            widths[i] = widths[i].max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for record in records {
        push_row(&mut out, &record.to_fields(), &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}
