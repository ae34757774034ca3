use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::service::FetchRateService;
use crate::storage::repository::CurrencyPairRepository;
use crate::worker::lifecycle::Worker;

/// 預設迭代間隔（秒）
const DEFAULT_SLEEP_INTERVAL: Duration = Duration::from_secs(60);

/// 匯率自動抓取 worker
///
/// 每輪列出所有 observe=true 的交易對並逐一抓取最新匯率。
/// 單一交易對失敗只記錄並跳過，不會中斷整輪或整個 worker。
pub struct ExchangeRateWorker {
    pairs: Arc<dyn CurrencyPairRepository>,
    fetcher: FetchRateService,
    sleep_interval: Duration,
}

impl ExchangeRateWorker {
    pub const NAME: &'static str = "exchange_rate";

    pub fn new(pairs: Arc<dyn CurrencyPairRepository>, fetcher: FetchRateService) -> Self {
        Self {
            pairs,
            fetcher,
            sleep_interval: DEFAULT_SLEEP_INTERVAL,
        }
    }
}

#[async_trait::async_trait]
impl Worker for ExchangeRateWorker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn sleep_interval(&self) -> Duration {
        self.sleep_interval
    }

    fn set_sleep_interval(&mut self, interval: Duration) {
        self.sleep_interval = interval;
    }

    async fn process(&self) -> Result<()> {
        info!("Fetching exchange rates for observed currency pairs");

        let observed = self.pairs.find_observed().await?;

        if observed.is_empty() {
            info!("No observed currency pairs found");
            return Ok(());
        }

        info!("Found {} observed currency pairs", observed.len());

        for pair in &observed {
            let label = pair.label();
            info!("Fetching exchange rate for {label}");

            match self.fetcher.execute(pair).await {
                Ok(fetched) => {
                    info!("Successfully fetched rate for {label}: {}", fetched.details);
                }
                Err(err) => {
                    warn!("Error fetching exchange rate for {label}: {err}");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRateProvider;
    use crate::storage::models::{ExchangeRate, PairWithCurrencies};
    use crate::storage::repository::currency_pair::MockCurrencyPairRepository;
    use crate::storage::repository::exchange_rate::MockExchangeRateRepository;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn pair(id: i32, from: &str, to: &str) -> PairWithCurrencies {
        PairWithCurrencies {
            id,
            from_code: from.to_string(),
            from_name: from.to_string(),
            to_code: to.to_string(),
            to_name: to.to_string(),
            observe: true,
        }
    }

    fn worker_with(
        observed: Vec<PairWithCurrencies>,
        provider: MockRateProvider,
        rates: MockExchangeRateRepository,
    ) -> ExchangeRateWorker {
        let mut pairs = MockCurrencyPairRepository::new();
        pairs
            .expect_find_observed()
            .returning(move || Ok(observed.clone()));

        let fetcher = FetchRateService::new(Arc::new(provider), Arc::new(rates));
        ExchangeRateWorker::new(Arc::new(pairs), fetcher)
    }

    #[tokio::test]
    async fn test_single_pair_failure_does_not_abort_tick() {
        let mut provider = MockRateProvider::new();
        provider.expect_latest_rates().returning(|base, targets| {
            // 第一個交易對的上游失敗，第二個成功
            if base == "USD" {
                Err(crate::error::Error::UpstreamApi {
                    status: Some(500),
                    body: "server error".to_string(),
                })
            } else {
                let mut map = HashMap::new();
                map.insert(targets[0].clone(), dec!(0.8532));
                Ok(map)
            }
        });

        let mut rates = MockExchangeRateRepository::new();
        rates
            .expect_save()
            .times(1)
            .returning(|pair_id, rate, date| {
                Ok(ExchangeRate {
                    id: 1,
                    pair_id,
                    rate,
                    date,
                })
            });

        let worker = worker_with(
            vec![pair(1, "USD", "EUR"), pair(2, "GBP", "CHF")],
            provider,
            rates,
        );

        // 整輪完成且不回傳錯誤
        worker.process().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_observed_set_is_noop() {
        let provider = MockRateProvider::new();
        let mut rates = MockExchangeRateRepository::new();
        rates.expect_save().times(0);

        let worker = worker_with(Vec::new(), provider, rates);

        worker.process().await.unwrap();
    }

    #[tokio::test]
    async fn test_all_observed_pairs_processed() {
        let mut provider = MockRateProvider::new();
        provider.expect_latest_rates().returning(|_, targets| {
            let mut map = HashMap::new();
            map.insert(targets[0].clone(), dec!(1.2345));
            Ok(map)
        });

        let mut rates = MockExchangeRateRepository::new();
        rates
            .expect_save()
            .times(2)
            .returning(|pair_id, rate, date| {
                Ok(ExchangeRate {
                    id: pair_id,
                    pair_id,
                    rate,
                    date,
                })
            });

        let worker = worker_with(
            vec![pair(1, "USD", "EUR"), pair(2, "GBP", "CHF")],
            provider,
            rates,
        );

        worker.process().await.unwrap();
    }
}
