use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rate_center::{config, storage};
use sqlx::Row;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "migrate", about = "rate-center 數據庫遷移工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 運行所有未應用的遷移
    Run,

    /// 檢查遷移狀態
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌系統
    tracing_subscriber::fmt()
        .with_env_filter("rate_center=info")
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // 初始化配置
    config::init_config().context("無法加載應用程序配置")?;

    // 解析命令行參數
    let cli = Cli::parse();

    // 執行命令
    match cli.command {
        Commands::Run => {
            info!("開始運行資料庫遷移...");
            let pool = storage::database::get_db_pool(true)
                .await
                .context("無法初始化資料庫連接池")?;
            storage::run_migrations(pool)
                .await
                .context("資料庫遷移執行失敗")?;
            info!("資料庫遷移完成！");
        }

        Commands::Status => {
            let pool = storage::database::get_db_pool(true)
                .await
                .context("無法初始化資料庫連接池")?;

            let rows = sqlx::query(
                "SELECT version, description, installed_on FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(pool)
            .await
            .context("無法讀取遷移狀態")?;

            if rows.is_empty() {
                println!("尚未應用任何遷移");
                return Ok(());
            }

            for row in &rows {
                let version: i64 = row.get("version");
                let description: String = row.get("description");
                println!("{version}  {description}");
            }
        }
    }

    Ok(())
}
