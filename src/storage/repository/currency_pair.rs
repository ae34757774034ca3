use sqlx::PgPool;

use crate::error::Result;
use crate::storage::models::{CurrencyPair, PairWithCurrencies};

/// 帶貨幣代碼的交易對查詢 SELECT 片段
const PAIR_SELECT: &str = r#"
    SELECT
        p.id,
        f.code AS from_code,
        f.name AS from_name,
        t.code AS to_code,
        t.name AS to_name,
        p.observe
    FROM currency_pair p
    JOIN currency_data f ON f.id = p.currency_from
    JOIN currency_data t ON t.id = p.currency_to
"#;

/// 交易對數據存取接口
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CurrencyPairRepository: Send + Sync {
    /// 創建交易對
    async fn create(&self, from_id: i32, to_id: i32, observe: bool) -> Result<CurrencyPair>;

    /// 根據ID獲取交易對（含兩側貨幣資訊）
    async fn find_by_id(&self, id: i32) -> Result<Option<PairWithCurrencies>>;

    /// 查找既有的有序組合
    async fn find_existing(&self, from_id: i32, to_id: i32) -> Result<Option<CurrencyPair>>;

    /// 列出交易對，可依貨幣代碼過濾（比對任一側）
    async fn list<'a>(&'a self, filter_code: Option<&'a str>) -> Result<Vec<PairWithCurrencies>>;

    /// 變更 observe 狀態
    async fn set_observe(&self, id: i32, status: bool) -> Result<()>;

    /// 獲取所有 observe=true 的交易對
    async fn find_observed(&self) -> Result<Vec<PairWithCurrencies>>;
}

/// PostgreSQL交易對數據存取實現
pub struct PgCurrencyPairRepository {
    pool: PgPool,
}

impl PgCurrencyPairRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CurrencyPairRepository for PgCurrencyPairRepository {
    async fn create(&self, from_id: i32, to_id: i32, observe: bool) -> Result<CurrencyPair> {
        let pair = sqlx::query_as::<_, CurrencyPair>(
            r#"
            INSERT INTO currency_pair (currency_from, currency_to, observe)
            VALUES ($1, $2, $3)
            RETURNING id, currency_from, currency_to, observe
            "#,
        )
        .bind(from_id)
        .bind(to_id)
        .bind(observe)
        .fetch_one(&self.pool)
        .await?;

        Ok(pair)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<PairWithCurrencies>> {
        let sql = format!("{PAIR_SELECT} WHERE p.id = $1");
        let record = sqlx::query_as::<_, PairWithCurrencies>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_existing(&self, from_id: i32, to_id: i32) -> Result<Option<CurrencyPair>> {
        let record = sqlx::query_as::<_, CurrencyPair>(
            r#"
            SELECT id, currency_from, currency_to, observe
            FROM currency_pair
            WHERE currency_from = $1 AND currency_to = $2
            "#,
        )
        .bind(from_id)
        .bind(to_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list<'a>(&'a self, filter_code: Option<&'a str>) -> Result<Vec<PairWithCurrencies>> {
        let records = match filter_code {
            Some(code) => {
                let sql = format!(
                    "{PAIR_SELECT} WHERE f.code = $1 OR t.code = $1 ORDER BY p.id"
                );
                sqlx::query_as::<_, PairWithCurrencies>(&sql)
                    .bind(code.to_uppercase())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{PAIR_SELECT} ORDER BY p.id");
                sqlx::query_as::<_, PairWithCurrencies>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(records)
    }

    async fn set_observe(&self, id: i32, status: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE currency_pair
            SET observe = $1
            WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_observed(&self) -> Result<Vec<PairWithCurrencies>> {
        let sql = format!("{PAIR_SELECT} WHERE p.observe = TRUE ORDER BY p.id");
        let records = sqlx::query_as::<_, PairWithCurrencies>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}
