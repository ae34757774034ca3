use std::sync::Arc;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::provider::RateProvider;
use crate::storage::models::{ExchangeRate, PairWithCurrencies};
use crate::storage::repository::ExchangeRateRepository;

/// 抓取並寫入後的匯率記錄
#[derive(Debug)]
pub struct FetchedRate {
    pub record: ExchangeRate,
    pub details: String,
}

/// 匯率抓取服務
///
/// 向上游取得交易對的最新匯率並落庫。每次呼叫單發、不重試；
/// 由 CLI 的 fetch-rate 與 worker 的每輪處理共用。
pub struct FetchRateService {
    provider: Arc<dyn RateProvider>,
    rates: Arc<dyn ExchangeRateRepository>,
}

impl FetchRateService {
    pub fn new(provider: Arc<dyn RateProvider>, rates: Arc<dyn ExchangeRateRepository>) -> Self {
        Self { provider, rates }
    }

    /// 抓取最新匯率並新增記錄
    pub async fn execute(&self, pair: &PairWithCurrencies) -> Result<FetchedRate> {
        let quotes = self
            .provider
            .latest_rates(&pair.from_code, &[pair.to_code.clone()])
            .await?;

        let rate = quotes.get(&pair.to_code).copied().ok_or_else(|| {
            Error::UpstreamApi {
                status: None,
                body: format!(
                    "Could not fetch exchange rate for {} → {}",
                    pair.from_code, pair.to_code
                ),
            }
        })?;

        let record = self.rates.save(pair.id, rate, Utc::now()).await?;

        let details = format!(
            "1 {} = {} {} (as of {})",
            pair.from_code,
            record.rate,
            pair.to_code,
            record.date.format("%Y-%m-%d %H:%M:%S")
        );

        Ok(FetchedRate { record, details })
    }
}
