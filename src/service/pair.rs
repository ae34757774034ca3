use std::sync::Arc;

use crate::error::{Error, Result};
use crate::storage::models::CurrencyPair;
use crate::storage::repository::{CurrencyPairRepository, CurrencyRepository};

/// 交易對創建結果
///
/// 重複的有序組合不是錯誤：`created=false` 並附上既有交易對。
#[derive(Debug)]
pub struct PairCreation {
    pub created: bool,
    pub pair: CurrencyPair,
    pub message: String,
}

/// observe 狀態變更結果
#[derive(Debug)]
pub struct ObserveChange {
    pub pair_id: i32,
    pub from_code: String,
    pub to_code: String,
    pub old_status: bool,
    pub new_status: bool,
    pub message: String,
}

/// 交易對管理服務
pub struct PairService {
    currencies: Arc<dyn CurrencyRepository>,
    pairs: Arc<dyn CurrencyPairRepository>,
}

impl PairService {
    pub fn new(
        currencies: Arc<dyn CurrencyRepository>,
        pairs: Arc<dyn CurrencyPairRepository>,
    ) -> Self {
        Self { currencies, pairs }
    }

    /// 驗證並創建交易對
    ///
    /// 兩側貨幣必須已存在且不相同；同一有序組合至多一筆，
    /// 重複創建回傳既有交易對且 `created=false`。
    pub async fn create_with_validation(
        &self,
        from_code: &str,
        to_code: &str,
        observe: bool,
    ) -> Result<PairCreation> {
        let from_code = from_code.to_uppercase();
        let to_code = to_code.to_uppercase();

        if from_code == to_code {
            return Err(Error::Validation(
                "From and To currencies cannot be the same.".to_string(),
            ));
        }

        let from_currency = self
            .currencies
            .find_by_code(&from_code)
            .await?
            .ok_or_else(|| Error::NotFound(missing_currency_message(&from_code)))?;

        let to_currency = self
            .currencies
            .find_by_code(&to_code)
            .await?
            .ok_or_else(|| Error::NotFound(missing_currency_message(&to_code)))?;

        if let Some(existing) = self
            .pairs
            .find_existing(from_currency.id, to_currency.id)
            .await?
        {
            return Ok(PairCreation {
                created: false,
                pair: existing,
                message: format!("Currency pair {from_code} → {to_code} already exists."),
            });
        }

        let pair = self
            .pairs
            .create(from_currency.id, to_currency.id, observe)
            .await?;

        Ok(PairCreation {
            created: true,
            pair,
            message: format!("Currency pair {from_code} → {to_code} created successfully!"),
        })
    }

    /// 解析 observe 狀態參數
    pub fn parse_status(status_arg: &str) -> Result<bool> {
        match status_arg.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::Validation(
                "Status must be either \"true\" or \"false\".".to_string(),
            )),
        }
    }

    /// 變更交易對的 observe 狀態
    pub async fn change_observe_status(&self, id: i32, status: bool) -> Result<ObserveChange> {
        let pair = self
            .pairs
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Currency pair with ID {id} not found.")))?;

        let old_status = pair.observe;

        if old_status != status {
            self.pairs.set_observe(id, status).await?;
        }

        let status_text = observe_text(status);
        let old_status_text = observe_text(old_status);

        Ok(ObserveChange {
            pair_id: id,
            from_code: pair.from_code.clone(),
            to_code: pair.to_code.clone(),
            old_status,
            new_status: status,
            message: format!(
                "Currency pair {} → {} (ID: {id}) status changed from {old_status_text} to {status_text}.",
                pair.from_code, pair.to_code
            ),
        })
    }
}

fn missing_currency_message(code: &str) -> String {
    format!("Currency '{code}' not found. Please fetch currencies first with the fetch-currencies command.")
}

fn observe_text(status: bool) -> &'static str {
    if status {
        "observed"
    } else {
        "not observed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{Currency, PairWithCurrencies};
    use crate::storage::repository::currency::MockCurrencyRepository;
    use crate::storage::repository::currency_pair::MockCurrencyPairRepository;
    use mockall::predicate::eq;

    fn currency(id: i32, code: &str) -> Currency {
        Currency {
            id,
            code: code.to_string(),
            symbol: "$".to_string(),
            name: code.to_string(),
            symbol_native: "$".to_string(),
            decimal_digits: 2,
            rounding: 0.0,
            name_plural: code.to_string(),
            currency_type: None,
        }
    }

    fn existing_pair() -> CurrencyPair {
        CurrencyPair {
            id: 42,
            currency_from: 1,
            currency_to: 2,
            observe: true,
        }
    }

    fn currencies_with(codes: &[(&'static str, i32)]) -> MockCurrencyRepository {
        let mut repo = MockCurrencyRepository::new();
        for (code, id) in codes.iter().copied() {
            repo.expect_find_by_code()
                .with(eq(code))
                .returning(move |c| Ok(Some(currency(id, c))));
        }
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo
    }

    #[tokio::test]
    async fn test_same_currency_both_sides_rejected() {
        let service = PairService::new(
            Arc::new(MockCurrencyRepository::new()),
            Arc::new(MockCurrencyPairRepository::new()),
        );

        let err = service
            .create_with_validation("USD", "usd", true)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_currency_rejected() {
        let currencies = currencies_with(&[("USD", 1)]);
        let service = PairService::new(
            Arc::new(currencies),
            Arc::new(MockCurrencyPairRepository::new()),
        );

        let err = service
            .create_with_validation("USD", "XXX", true)
            .await
            .unwrap_err();

        match err {
            Error::NotFound(message) => assert!(message.contains("'XXX'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_pair_returns_existing_unchanged() {
        let currencies = currencies_with(&[("USD", 1), ("EUR", 2)]);

        let mut pairs = MockCurrencyPairRepository::new();
        pairs
            .expect_find_existing()
            .with(eq(1), eq(2))
            .returning(|_, _| Ok(Some(existing_pair())));
        // 重複創建不得再呼叫 create
        pairs.expect_create().times(0);

        let service = PairService::new(Arc::new(currencies), Arc::new(pairs));
        let result = service
            .create_with_validation("USD", "EUR", false)
            .await
            .unwrap();

        assert!(!result.created);
        assert_eq!(result.pair.id, 42);
        assert!(result.pair.observe);
        assert_eq!(result.message, "Currency pair USD → EUR already exists.");
    }

    #[tokio::test]
    async fn test_create_new_pair() {
        let currencies = currencies_with(&[("USD", 1), ("EUR", 2)]);

        let mut pairs = MockCurrencyPairRepository::new();
        pairs
            .expect_find_existing()
            .returning(|_, _| Ok(None));
        pairs
            .expect_create()
            .with(eq(1), eq(2), eq(true))
            .returning(|from_id, to_id, observe| {
                Ok(CurrencyPair {
                    id: 1,
                    currency_from: from_id,
                    currency_to: to_id,
                    observe,
                })
            });

        let service = PairService::new(Arc::new(currencies), Arc::new(pairs));
        let result = service
            .create_with_validation("usd", "eur", true)
            .await
            .unwrap();

        assert!(result.created);
        assert_eq!(result.message, "Currency pair USD → EUR created successfully!");
    }

    #[test]
    fn test_parse_status() {
        assert!(PairService::parse_status("true").unwrap());
        assert!(PairService::parse_status("TRUE").unwrap());
        assert!(!PairService::parse_status("false").unwrap());
        assert!(matches!(
            PairService::parse_status("yes"),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_change_observe_status_unknown_pair() {
        let mut pairs = MockCurrencyPairRepository::new();
        pairs.expect_find_by_id().returning(|_| Ok(None));

        let service = PairService::new(Arc::new(MockCurrencyRepository::new()), Arc::new(pairs));
        let err = service.change_observe_status(9, true).await.unwrap_err();

        match err {
            Error::NotFound(message) => {
                assert_eq!(message, "Currency pair with ID 9 not found.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_change_observe_status_skips_noop_write() {
        let mut pairs = MockCurrencyPairRepository::new();
        pairs.expect_find_by_id().returning(|id| {
            Ok(Some(PairWithCurrencies {
                id,
                from_code: "USD".to_string(),
                from_name: "US Dollar".to_string(),
                to_code: "EUR".to_string(),
                to_name: "Euro".to_string(),
                observe: true,
            }))
        });
        // 狀態相同時不寫入
        pairs.expect_set_observe().times(0);

        let service = PairService::new(Arc::new(MockCurrencyRepository::new()), Arc::new(pairs));
        let change = service.change_observe_status(3, true).await.unwrap();

        assert!(change.old_status);
        assert!(change.new_status);
        assert_eq!(
            change.message,
            "Currency pair USD → EUR (ID: 3) status changed from observed to observed."
        );
    }

    #[tokio::test]
    async fn test_change_observe_status_writes_on_change() {
        let mut pairs = MockCurrencyPairRepository::new();
        pairs.expect_find_by_id().returning(|id| {
            Ok(Some(PairWithCurrencies {
                id,
                from_code: "USD".to_string(),
                from_name: "US Dollar".to_string(),
                to_code: "EUR".to_string(),
                to_name: "Euro".to_string(),
                observe: true,
            }))
        });
        pairs
            .expect_set_observe()
            .with(eq(3), eq(false))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = PairService::new(Arc::new(MockCurrencyRepository::new()), Arc::new(pairs));
        let change = service.change_observe_status(3, false).await.unwrap();

        assert!(change.old_status);
        assert!(!change.new_status);
    }
}
