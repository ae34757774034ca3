use std::sync::Arc;

use crate::error::Result;
use crate::query::date_filter::DateFilter;
use crate::storage::models::{ExchangeRate, PairWithCurrencies};
use crate::storage::repository::ExchangeRateRepository;

/// 匯率查詢結果
///
/// 零筆結果是合法狀態，與解析失敗不同；呼叫端以 `summary()` 取得
/// 對應的提示文字。
#[derive(Debug)]
pub struct RateQueryResult {
    pub rates: Vec<ExchangeRate>,
    pub title: String,
    pub description: String,
    pub count: usize,
    pub from_code: String,
    pub to_code: String,
}

impl RateQueryResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 查詢結果摘要文字
    pub fn summary(&self) -> String {
        if self.is_empty() {
            format!(
                "No exchange rates found for {} → {} {}",
                self.from_code, self.to_code, self.description
            )
        } else {
            format!(
                "Found {} exchange rate(s) for {} → {} {}",
                self.count, self.from_code, self.to_code, self.description
            )
        }
    }
}

/// 匯率查詢引擎
///
/// 將使用者輸入的日期參數交給 `DateFilter` 解析，再向存儲層取回
/// 符合的記錄，並組出帶交易對代碼與過濾描述的標題。
pub struct RateQueryEngine {
    rates: Arc<dyn ExchangeRateRepository>,
}

impl RateQueryEngine {
    pub fn new(rates: Arc<dyn ExchangeRateRepository>) -> Self {
        Self { rates }
    }

    /// 執行查詢
    pub async fn execute(
        &self,
        pair: &PairWithCurrencies,
        raw_date: Option<&str>,
        raw_to_date: Option<&str>,
    ) -> Result<RateQueryResult> {
        let filter = DateFilter::parse(raw_date, raw_to_date)?;
        let records = self.rates.find_by_filter(pair.id, &filter).await?;

        let description = filter.description();
        let title = Self::build_title(&pair.from_code, &pair.to_code, &filter, &description);

        Ok(RateQueryResult {
            count: records.len(),
            rates: records,
            title,
            description,
            from_code: pair.from_code.clone(),
            to_code: pair.to_code.clone(),
        })
    }

    fn build_title(
        from_code: &str,
        to_code: &str,
        filter: &DateFilter,
        description: &str,
    ) -> String {
        match filter {
            DateFilter::Latest => format!("Latest exchange rate for {from_code} → {to_code}"),
            _ => format!("Exchange rates for {from_code} → {to_code} ({description})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::exchange_rate::MockExchangeRateRepository;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn pair() -> PairWithCurrencies {
        PairWithCurrencies {
            id: 7,
            from_code: "USD".to_string(),
            from_name: "US Dollar".to_string(),
            to_code: "EUR".to_string(),
            to_name: "Euro".to_string(),
            observe: true,
        }
    }

    fn record(id: i32) -> ExchangeRate {
        ExchangeRate {
            id,
            pair_id: 7,
            rate: dec!(0.9013),
            date: Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_latest_query_title_and_summary() {
        let mut rates = MockExchangeRateRepository::new();
        rates
            .expect_find_by_filter()
            .with(eq(7), eq(DateFilter::Latest))
            .returning(|_, _| Ok(vec![record(1)]));

        let engine = RateQueryEngine::new(Arc::new(rates));
        let result = engine.execute(&pair(), None, None).await.unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.title, "Latest exchange rate for USD → EUR");
        assert_eq!(result.summary(), "Found 1 exchange rate(s) for USD → EUR latest");
    }

    #[tokio::test]
    async fn test_zero_results_is_valid_response() {
        let mut rates = MockExchangeRateRepository::new();
        rates
            .expect_find_by_filter()
            .returning(|_, _| Ok(Vec::new()));

        let engine = RateQueryEngine::new(Arc::new(rates));
        let result = engine
            .execute(&pair(), Some("2023-01-01"), None)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.count, 0);
        assert_eq!(
            result.summary(),
            "No exchange rates found for USD → EUR on 2023-01-01"
        );
        assert_eq!(
            result.title,
            "Exchange rates for USD → EUR (on 2023-01-01)"
        );
    }

    #[tokio::test]
    async fn test_parse_failure_propagates() {
        let rates = MockExchangeRateRepository::new();
        let engine = RateQueryEngine::new(Arc::new(rates));

        let err = engine
            .execute(&pair(), Some("garbage"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::error::Error::InvalidDate(_)));
    }
}
