use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use serde::{Deserialize, Serialize};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub currency_api: CurrencyApiConfig,
    pub worker: WorkerConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.database.validate()?;
        self.log.validate()?;
        self.currency_api.validate()?;
        self.worker.validate()?;

        Ok(())
    }
}

/// 數據庫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證數據庫配置
        ValidationUtils::not_empty(&self.host, "database.host")?;
        ValidationUtils::not_empty(&self.username, "database.username")?;
        ValidationUtils::not_empty(&self.database, "database.database")?;
        ValidationUtils::in_range(self.port, 1, 65535, "database.port")?;
        ValidationUtils::in_range(
            self.max_connections,
            self.min_connections,
            1000,
            "database.max_connections",
        )?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}

/// 匯率 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyApiConfig {
    /// API 基礎 URL (例如: "https://api.freecurrencyapi.com/v1")
    pub base_url: String,
    /// API 金鑰，以查詢參數傳遞
    pub api_key: String,
    /// 單次請求超時（秒）
    pub request_timeout_secs: u64,
}

impl CurrencyApiConfig {
    /// 獲取請求超時持續時間
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validator for CurrencyApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證API配置；api_key 允許留空由環境變數提供
        ValidationUtils::not_empty(&self.base_url, "currency_api.base_url")?;
        ValidationUtils::in_range(
            self.request_timeout_secs,
            1,
            300,
            "currency_api.request_timeout_secs",
        )?;

        Ok(())
    }
}

/// Worker 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// 鎖檔與停止檔存放目錄
    pub lock_dir: String,
    /// 迭代間隔（秒）
    pub sleep_interval_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            lock_dir: "var/worker_locks".to_string(),
            sleep_interval_secs: 60,
        }
    }
}

impl Validator for WorkerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證Worker配置
        ValidationUtils::not_empty(&self.lock_dir, "worker.lock_dir")?;
        ValidationUtils::in_range(
            self.sleep_interval_secs,
            1,
            86400,
            "worker.sleep_interval_secs",
        )?;

        Ok(())
    }
}
