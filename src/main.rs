use clap::{Args, Parser, Subcommand};
use option_tracker::{
    core::config::JournalConfig,
    core::error::JournalError,
    core::store::CsvRecordStore,
    core::traits::RecordStore,
    core::types::{FieldName, TradeKey},
    form::{FormController, NewTradeForm, UpdateForm},
    utils::{
        create_default_config, init_logger, render_record, render_summary, render_table,
        write_default_config,
    },
    QueryEngine,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "option_tracker", version, about = "期权卖方交易记录工具")]
struct Cli {
    /// YAML配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 交易记录CSV文件，覆盖配置中的路径
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 创建交易记录文件（已存在则不做任何事）
    Init {
        /// 同时写出默认配置文件
        #[arg(long)]
        write_config: Option<PathBuf>,
    },
    /// 新增交易
    Add {
        #[command(flatten)]
        fields: FieldArgs,
        /// 是否已对冲 (y/n)
        #[arg(long, default_value = "n")]
        hedged: String,
    },
    /// 显示全部交易及汇总
    List {
        #[arg(long)]
        json: bool,
    },
    /// 按主键查找交易
    Search {
        #[command(flatten)]
        key: KeyArgs,
        #[arg(long)]
        json: bool,
    },
    /// 修改交易，未填写的字段保留原值
    Update {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// 删除交易
    Delete {
        #[command(flatten)]
        key: KeyArgs,
        /// 跳过确认
        #[arg(short, long)]
        yes: bool,
    },
    /// 清空全部交易
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// 汇总统计
    Summary {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct KeyArgs {
    #[arg(value_name = "STRATEGY")]
    key_strategy: String,
    #[arg(value_name = "DATE")]
    key_date: String,
    #[arg(value_name = "INSTRUMENT")]
    key_instrument: String,
}

impl KeyArgs {
    fn to_key(&self) -> TradeKey {
        TradeKey::new(&self.key_strategy, &self.key_date, &self.key_instrument)
    }
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    strategy: Option<String>,
    /// 交易日期 (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    instrument: Option<String>,
    #[arg(long)]
    strike: Option<String>,
    /// Buy/Sell
    #[arg(long)]
    side: Option<String>,
    /// 到期日 (YYYY-MM-DD)
    #[arg(long)]
    expiry: Option<String>,
    /// CE/PE
    #[arg(long)]
    option_type: Option<String>,
    #[arg(long)]
    lots: Option<String>,
    #[arg(long)]
    entry: Option<String>,
    #[arg(long)]
    exit: Option<String>,
    #[arg(long)]
    hedge_strike: Option<String>,
    #[arg(long)]
    hedge_side: Option<String>,
    #[arg(long)]
    hedge_entry: Option<String>,
    #[arg(long)]
    hedge_exit: Option<String>,
    #[arg(long)]
    margin: Option<String>,
    /// 持仓天数
    #[arg(long)]
    holding_period: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pnl: Option<String>,
}

impl FieldArgs {
    fn values(&self) -> [(FieldName, &Option<String>); 17] {
        [
            (FieldName::StrategyName, &self.strategy),
            (FieldName::TradeDate, &self.date),
            (FieldName::Instrument, &self.instrument),
            (FieldName::StrikePrice, &self.strike),
            (FieldName::Side, &self.side),
            (FieldName::ExpiryDate, &self.expiry),
            (FieldName::OptionType, &self.option_type),
            (FieldName::Lots, &self.lots),
            (FieldName::EntryPrice, &self.entry),
            (FieldName::ExitPrice, &self.exit),
            (FieldName::HedgeStrikePrice, &self.hedge_strike),
            (FieldName::HedgeSide, &self.hedge_side),
            (FieldName::HedgeEntryPrice, &self.hedge_entry),
            (FieldName::HedgeExitPrice, &self.hedge_exit),
            (FieldName::MarginUsed, &self.margin),
            (FieldName::HoldingPeriod, &self.holding_period),
            (FieldName::ProfitLoss, &self.pnl),
        ]
    }

    fn to_new_form(&self, hedged: &str) -> NewTradeForm {
        let mut form = NewTradeForm::new().with_hedged(hedged);
        for (field, value) in self.values() {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        form
    }

    fn to_update_form(&self) -> UpdateForm {
        let mut form = UpdateForm::new();
        for (field, value) in self.values() {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        form
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logger(&config.log) {
        eprintln!("⚠️ 日志初始化失败: {}", e);
    }

    if let Err(e) = run(cli.command, &config) {
        let message = match e.downcast_ref::<JournalError>() {
            Some(err) => {
                log::error!("操作失败: {}", err);
                err.user_message()
            }
            None => e.to_string(),
        };
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<JournalConfig, JournalError> {
    let config = match &cli.config {
        Some(path) => JournalConfig::from_file(path)?,
        None => create_default_config(),
    };

    Ok(match &cli.file {
        Some(path) => config.with_store_path(path),
        None => config,
    })
}

fn run(command: Commands, config: &JournalConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Init { write_config } = &command {
        let store = CsvRecordStore::new(&config.store.path);
        store.initialize()?;
        println!("Trade file ready: {}", store.path().display());
        if let Some(path) = write_config {
            if write_default_config(path)? {
                println!("Config written: {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        return Ok(());
    }

    let store = CsvRecordStore::open(&config.store)?;
    let controller = FormController::new(&store);
    let queries = QueryEngine::new(&store);

    match command {
        Commands::Init { .. } => {}
        Commands::Add { fields, hedged } => {
            let record = controller.add_trade(&fields.to_new_form(&hedged))?;
            println!("Trade '{}' added.", record.strategy_name);
        }
        Commands::List { json } => {
            let records = queries.list()?;
            let summary = option_tracker::summarize(&records);
            if json {
                let out = serde_json::json!({ "records": records, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render_table(&records));
                println!();
                println!("{}", render_summary(&summary));
            }
        }
        Commands::Search { key, json } => {
            let record = queries.search(&key.to_key())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render_record(&record));
            }
        }
        Commands::Update { key, fields } => {
            let changes = fields.to_update_form();
            if changes.is_empty() {
                log::info!("未提供任何修改字段，记录保持不变");
            }
            let record = controller.update_trade(&key.to_key(), &changes)?;
            println!("Trade '{}' updated.", record.strategy_name);
        }
        Commands::Delete { key, yes } => {
            let key = key.to_key();
            controller.validate_delete(&key)?;
            if !yes && !confirm("Are you sure you want to delete the selected trade?")? {
                println!("Cancelled.");
                return Ok(());
            }
            controller.delete_trade(&key)?;
            println!("Trade '{}' deleted successfully.", key.strategy.trim());
        }
        Commands::Clear { yes } => {
            if !yes && !confirm("Are you sure you want to permanently clear ALL trade records?")? {
                println!("Cancelled.");
                return Ok(());
            }
            controller.clear_all()?;
            println!("All trade records have been cleared.");
        }
        Commands::Summary { json } => {
            let summary = queries.aggregate()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render_summary(&summary));
            }
        }
    }

    Ok(())
}

/// 从stdin读取 y/N 确认
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
