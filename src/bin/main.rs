use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rate_center::config;
use rate_center::provider::CurrencyApiClient;
use rate_center::query::RateQueryEngine;
use rate_center::service::{FetchCurrenciesService, FetchRateService, PairService};
use rate_center::storage::database;
use rate_center::storage::repository::{
    CurrencyPairRepository, CurrencyRepository, PgCurrencyPairRepository, PgCurrencyRepository,
    PgExchangeRateRepository,
};
use rate_center::worker::{ExchangeRateWorker, WorkerLifecycle, WorkerRegistry};

#[derive(Parser)]
#[command(name = "rate_center", about = "Currency exchange rate tracking service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 從上游同步貨幣元數據
    FetchCurrencies {
        /// 要同步的貨幣代碼（留空同步全部）
        codes: Vec<String>,
    },

    /// 列出已儲存的貨幣
    ListCurrencies,

    /// 創建貨幣交易對
    CreatePair {
        /// 基準貨幣代碼
        from: String,
        /// 目標貨幣代碼
        to: String,
        /// 是否納入 worker 觀察 (true 或 false)
        #[arg(long, default_value = "true")]
        observe: String,
    },

    /// 列出交易對，可依貨幣代碼過濾
    ListPairs {
        /// 貨幣代碼過濾（比對任一側）
        code: Option<String>,
    },

    /// 變更交易對的 observe 狀態
    PairObserve {
        /// 交易對 ID
        id: i32,
        /// 新狀態 (true 或 false)
        status: String,
    },

    /// 為交易對抓取並寫入最新匯率
    FetchRate {
        /// 交易對 ID
        id: i32,
    },

    /// 查詢交易對匯率，可選日期過濾
    GetPairRate {
        /// 交易對 ID
        id: i32,
        /// 指定日期 (YYYY-MM-DD [HH:MM[:SS]]，或 "all")
        date: Option<String>,
        /// 區間結束日期 (YYYY-MM-DD [HH:MM[:SS]])
        to_date: Option<String>,
    },

    /// 控制 worker 進程
    Worker {
        /// worker 名稱
        worker: String,
        /// 動作 (on 或 off)
        action: String,
        /// 迭代次數上限（僅 "on" 動作）
        #[arg(short, long)]
        iterations: Option<u64>,
        /// 迭代間隔秒數（僅 "on" 動作）
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化配置
    config::init_config()?;
    let app_config = config::get_config();

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    // 解析命令行參數
    let cli = Cli::parse();

    // 獲取全局資料庫連線池
    let pool = database::get_db_pool(true).await?;

    let currencies = Arc::new(PgCurrencyRepository::new(pool.clone()));
    let pairs = Arc::new(PgCurrencyPairRepository::new(pool.clone()));
    let rates = Arc::new(PgExchangeRateRepository::new(pool.clone()));

    match cli.command {
        Commands::FetchCurrencies { codes } => {
            let provider = Arc::new(CurrencyApiClient::new(&app_config.currency_api)?);
            let service = FetchCurrenciesService::new(provider, currencies);

            let stats = service.execute(&codes).await?;

            println!(
                "Fetched currencies: {} added, {} updated",
                stats.added, stats.updated
            );
            if !stats.new_codes.is_empty() {
                println!("New: {}", stats.new_codes.join(", "));
            }
        }

        Commands::ListCurrencies => {
            let all = currencies.list_all().await?;

            if all.is_empty() {
                println!("No currencies found. Fetch currencies first with the fetch-currencies command.");
                return Ok(());
            }

            println!(
                "{:<6} {:<6} {:<30} {:<8} {:<8} {:<10}",
                "ID", "Code", "Name", "Symbol", "Digits", "Type"
            );
            for currency in &all {
                println!(
                    "{:<6} {:<6} {:<30} {:<8} {:<8} {:<10}",
                    currency.id,
                    currency.code,
                    currency.name,
                    currency.symbol,
                    currency.decimal_digits,
                    currency.currency_type.as_deref().unwrap_or("-")
                );
            }
            println!("Found {} currencies", all.len());
        }

        Commands::CreatePair { from, to, observe } => {
            let observe = PairService::parse_status(&observe)?;
            let service = PairService::new(currencies, pairs);

            let result = service.create_with_validation(&from, &to, observe).await?;
            println!("{}", result.message);
        }

        Commands::ListPairs { code } => {
            let listed = pairs.list(code.as_deref()).await?;

            let title = match &code {
                Some(code) => format!("Currency pairs involving {}", code.to_uppercase()),
                None => "All currency pairs".to_string(),
            };

            if listed.is_empty() {
                match &code {
                    Some(code) => println!(
                        "No currency pairs found involving {}",
                        code.to_uppercase()
                    ),
                    None => println!("No currency pairs found in the database"),
                }
                return Ok(());
            }

            println!("{title}");
            println!(
                "{:<6} {:<6} {:<20} {:<6} {:<20} {:<8}",
                "ID", "From", "Name", "To", "Name", "Observe"
            );
            for pair in &listed {
                println!(
                    "{:<6} {:<6} {:<20} {:<6} {:<20} {:<8}",
                    pair.id, pair.from_code, pair.from_name, pair.to_code, pair.to_name,
                    pair.observe
                );
            }
            println!("Found {} currency pair(s)", listed.len());
        }

        Commands::PairObserve { id, status } => {
            let status = PairService::parse_status(&status)?;
            let service = PairService::new(currencies, pairs);

            let change = service.change_observe_status(id, status).await?;
            println!("{}", change.message);
        }

        Commands::FetchRate { id } => {
            let pair = pairs
                .find_by_id(id)
                .await?
                .ok_or_else(|| anyhow!("Currency pair with ID {id} not found."))?;

            let provider = Arc::new(CurrencyApiClient::new(&app_config.currency_api)?);
            let service = FetchRateService::new(provider, rates);

            let fetched = service.execute(&pair).await?;

            println!("Exchange Rate: {}", pair.label());
            println!("Successfully fetched and stored exchange rate.");
            println!("{}", fetched.details);
        }

        Commands::GetPairRate { id, date, to_date } => {
            let pair = pairs
                .find_by_id(id)
                .await?
                .ok_or_else(|| anyhow!("Currency pair with ID {id} not found."))?;

            let engine = RateQueryEngine::new(rates);
            let result = engine
                .execute(&pair, date.as_deref(), to_date.as_deref())
                .await?;

            if result.is_empty() {
                println!("{}", result.summary());
                return Ok(());
            }

            println!("{}", result.title);
            println!("{:<6} {:<22} {:<16} {:<12}", "ID", "Date", "Rate", "Pair");
            for rate in &result.rates {
                println!(
                    "{:<6} {:<22} {:<16} {:<12}",
                    rate.id,
                    rate.date.format("%Y-%m-%d %H:%M:%S"),
                    rate.rate,
                    pair.label()
                );
            }
            println!("{}", result.summary());
        }

        Commands::Worker {
            worker,
            action,
            iterations,
            interval,
        } => {
            let provider = Arc::new(CurrencyApiClient::new(&app_config.currency_api)?);
            let fetcher = FetchRateService::new(provider, rates);
            let exchange_rate_worker = ExchangeRateWorker::new(pairs, fetcher);

            let lifecycle = WorkerLifecycle::new(&app_config.worker.lock_dir)?;
            let mut registry = WorkerRegistry::new(lifecycle);
            registry.register(Box::new(exchange_rate_worker));

            // CLI 覆寫優先於配置檔的間隔
            let interval = interval.or(Some(app_config.worker.sleep_interval_secs));

            registry
                .control(&worker, &action, iterations, interval)
                .await?;
        }
    }

    Ok(())
}

fn init_logging(log_config: &config::LogConfig) -> Result<()> {
    let level = match log_config.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // 默認為INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    Ok(())
}
