use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::config::CurrencyApiConfig;
use crate::error::{Error, Result};
use crate::provider::client::ApiClient;
use crate::provider::models::CurrencyMetadata;

/// 匯率數據提供者接口
///
/// 對應上游三個端點：貨幣清單、最新匯率、歷史匯率。
/// 核心流程僅依賴 `latest_rates`。
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// 獲取貨幣元數據，可依代碼過濾
    async fn list_currencies(&self, codes: &[String])
        -> Result<HashMap<String, CurrencyMetadata>>;

    /// 獲取以 base 計價的最新匯率
    async fn latest_rates(&self, base: &str, targets: &[String])
        -> Result<HashMap<String, Decimal>>;

    /// 獲取指定日期的歷史匯率
    async fn historical_rates(
        &self,
        date: NaiveDate,
        base: &str,
        targets: &[String],
    ) -> Result<HashMap<String, Decimal>>;
}

/// freecurrencyapi 風格的匯率 API 客戶端
///
/// API 金鑰以 `apikey` 查詢參數傳遞；所有回應包在 `{"data": ...}` 信封內。
pub struct CurrencyApiClient {
    client: ApiClient,
    api_key: String,
}

impl CurrencyApiClient {
    /// 依配置創建客戶端
    pub fn new(config: &CurrencyApiConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url, config.request_timeout())?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// 將代碼清單轉為大寫逗號分隔的查詢值
    fn join_codes(codes: &[String]) -> String {
        codes
            .iter()
            .map(|c| c.to_uppercase())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 解開 `{"data": ...}` 信封並反序列化為目標映射
fn decode_data<T: DeserializeOwned>(mut value: serde_json::Value) -> Result<HashMap<String, T>> {
    let data = value
        .get_mut("data")
        .map(serde_json::Value::take)
        .filter(|v| v.is_object())
        .ok_or_else(|| Error::UpstreamApi {
            status: None,
            body: "Invalid response from currency API".to_string(),
        })?;

    serde_json::from_value(data).map_err(|err| Error::UpstreamApi {
        status: None,
        body: format!("invalid response payload: {err}"),
    })
}

#[async_trait::async_trait]
impl RateProvider for CurrencyApiClient {
    async fn list_currencies(
        &self,
        codes: &[String],
    ) -> Result<HashMap<String, CurrencyMetadata>> {
        let mut query = vec![("apikey", self.api_key.clone())];

        if !codes.is_empty() {
            query.push(("currencies", Self::join_codes(codes)));
        }

        let response = self.client.get("currencies", &query).await?;
        decode_data(response)
    }

    async fn latest_rates(
        &self,
        base: &str,
        targets: &[String],
    ) -> Result<HashMap<String, Decimal>> {
        let mut query = vec![
            ("apikey", self.api_key.clone()),
            ("base_currency", base.to_uppercase()),
        ];

        if !targets.is_empty() {
            query.push(("currencies", Self::join_codes(targets)));
        }

        let response = self.client.get("latest", &query).await?;
        decode_data(response)
    }

    async fn historical_rates(
        &self,
        date: NaiveDate,
        base: &str,
        targets: &[String],
    ) -> Result<HashMap<String, Decimal>> {
        let mut query = vec![
            ("apikey", self.api_key.clone()),
            ("base_currency", base.to_uppercase()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ];

        if !targets.is_empty() {
            query.push(("currencies", Self::join_codes(targets)));
        }

        let response = self.client.get("historical", &query).await?;
        decode_data(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decode_data_unwraps_envelope() {
        let payload = json!({"data": {"EUR": 0.9013, "GBP": 0.7865}});
        let rates: HashMap<String, Decimal> = decode_data(payload).unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates["EUR"], dec!(0.9013));
    }

    #[test]
    fn test_decode_data_rejects_missing_envelope() {
        let payload = json!({"message": "forbidden"});
        let err = decode_data::<Decimal>(payload).unwrap_err();

        match err {
            Error::UpstreamApi { status, body } => {
                assert_eq!(status, None);
                assert_eq!(body, "Invalid response from currency API");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_data_rejects_non_object_data() {
        let payload = json!({"data": [1, 2, 3]});
        assert!(decode_data::<Decimal>(payload).is_err());
    }

    #[test]
    fn test_decode_currency_metadata() {
        let payload = json!({
            "data": {
                "USD": {
                    "symbol": "$",
                    "name": "US Dollar",
                    "symbol_native": "$",
                    "decimal_digits": 2,
                    "rounding": 0,
                    "code": "USD",
                    "name_plural": "US dollars",
                    "type": "fiat"
                }
            }
        });

        let currencies: HashMap<String, CurrencyMetadata> = decode_data(payload).unwrap();
        let usd = &currencies["USD"];

        assert_eq!(usd.name, "US Dollar");
        assert_eq!(usd.decimal_digits, 2);
        assert_eq!(usd.currency_type.as_deref(), Some("fiat"));
    }

    #[test]
    fn test_join_codes_uppercases() {
        let codes = vec!["usd".to_string(), "Eur".to_string()];
        assert_eq!(CurrencyApiClient::join_codes(&codes), "USD,EUR");
    }
}
