use sqlx::PgPool;

use crate::error::Result;
use crate::provider::CurrencyMetadata;
use crate::storage::models::Currency;

/// 貨幣數據存取接口
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CurrencyRepository: Send + Sync {
    /// 依代碼寫入或覆寫貨幣元數據，回傳 (記錄, 是否新建)
    async fn upsert(&self, code: &str, metadata: &CurrencyMetadata) -> Result<(Currency, bool)>;

    /// 根據代碼獲取貨幣
    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>>;

    /// 獲取所有貨幣（依代碼排序）
    async fn list_all(&self) -> Result<Vec<Currency>>;
}

/// PostgreSQL貨幣數據存取實現
pub struct PgCurrencyRepository {
    pool: PgPool,
}

impl PgCurrencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CurrencyRepository for PgCurrencyRepository {
    async fn upsert(&self, code: &str, metadata: &CurrencyMetadata) -> Result<(Currency, bool)> {
        // 先查找既有記錄，與重新同步時覆寫顯示欄位的語意一致
        let existing = self.find_by_code(code).await?;

        let currency = match &existing {
            Some(current) => {
                sqlx::query_as::<_, Currency>(
                    r#"
                    UPDATE currency_data
                    SET
                        symbol = $1,
                        name = $2,
                        symbol_native = $3,
                        decimal_digits = $4,
                        rounding = $5,
                        name_plural = $6,
                        type = $7
                    WHERE id = $8
                    RETURNING
                        id, code, symbol, name, symbol_native,
                        decimal_digits, rounding, name_plural, type
                    "#,
                )
                .bind(&metadata.symbol)
                .bind(&metadata.name)
                .bind(&metadata.symbol_native)
                .bind(metadata.decimal_digits)
                .bind(metadata.rounding)
                .bind(&metadata.name_plural)
                .bind(&metadata.currency_type)
                .bind(current.id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Currency>(
                    r#"
                    INSERT INTO currency_data (
                        code, symbol, name, symbol_native,
                        decimal_digits, rounding, name_plural, type
                    ) VALUES (
                        $1, $2, $3, $4, $5, $6, $7, $8
                    )
                    RETURNING
                        id, code, symbol, name, symbol_native,
                        decimal_digits, rounding, name_plural, type
                    "#,
                )
                .bind(code)
                .bind(&metadata.symbol)
                .bind(&metadata.name)
                .bind(&metadata.symbol_native)
                .bind(metadata.decimal_digits)
                .bind(metadata.rounding)
                .bind(&metadata.name_plural)
                .bind(&metadata.currency_type)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok((currency, existing.is_none()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let record = sqlx::query_as::<_, Currency>(
            r#"
            SELECT
                id, code, symbol, name, symbol_native,
                decimal_digits, rounding, name_plural, type
            FROM currency_data
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Currency>> {
        let records = sqlx::query_as::<_, Currency>(
            r#"
            SELECT
                id, code, symbol, name, symbol_native,
                decimal_digits, rounding, name_plural, type
            FROM currency_data
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
