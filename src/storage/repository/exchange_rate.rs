use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::Result;
use crate::query::DateFilter;
use crate::storage::models::ExchangeRate;

/// 匯率記錄存取接口
///
/// 僅追加：save 新增記錄，既有記錄不做修改或刪除。
/// 查無資料一律以空結果表示，不產生錯誤。
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExchangeRateRepository: Send + Sync {
    /// 新增一筆匯率記錄
    async fn save(&self, pair_id: i32, rate: Decimal, date: DateTime<Utc>)
        -> Result<ExchangeRate>;

    /// 獲取交易對最新一筆匯率
    async fn find_latest(&self, pair_id: i32) -> Result<Option<ExchangeRate>>;

    /// 依過濾器獲取交易對匯率記錄（時間戳降冪）
    async fn find_by_filter(&self, pair_id: i32, filter: &DateFilter)
        -> Result<Vec<ExchangeRate>>;
}

/// PostgreSQL匯率記錄存取實現
pub struct PgExchangeRateRepository {
    pool: PgPool,
}

impl PgExchangeRateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ExchangeRateRepository for PgExchangeRateRepository {
    async fn save(
        &self,
        pair_id: i32,
        rate: Decimal,
        date: DateTime<Utc>,
    ) -> Result<ExchangeRate> {
        let record = sqlx::query_as::<_, ExchangeRate>(
            r#"
            INSERT INTO currency_exchange_rate (pair_id, rate, date)
            VALUES ($1, $2, $3)
            RETURNING id, pair_id, rate, date
            "#,
        )
        .bind(pair_id)
        .bind(rate)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_latest(&self, pair_id: i32) -> Result<Option<ExchangeRate>> {
        let record = sqlx::query_as::<_, ExchangeRate>(
            r#"
            SELECT id, pair_id, rate, date
            FROM currency_exchange_rate
            WHERE pair_id = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(pair_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_filter(
        &self,
        pair_id: i32,
        filter: &DateFilter,
    ) -> Result<Vec<ExchangeRate>> {
        let records = match filter {
            DateFilter::Latest => {
                let latest = self.find_latest(pair_id).await?;
                latest.into_iter().collect()
            }
            DateFilter::All => {
                sqlx::query_as::<_, ExchangeRate>(
                    r#"
                    SELECT id, pair_id, rate, date
                    FROM currency_exchange_rate
                    WHERE pair_id = $1
                    ORDER BY date DESC
                    "#,
                )
                .bind(pair_id)
                .fetch_all(&self.pool)
                .await?
            }
            DateFilter::DayBucket(day) => {
                // 半開視窗 [day 00:00:00, day+1 00:00:00)
                let start = day.and_time(NaiveTime::MIN).and_utc();
                let end = start + Duration::days(1);

                sqlx::query_as::<_, ExchangeRate>(
                    r#"
                    SELECT id, pair_id, rate, date
                    FROM currency_exchange_rate
                    WHERE pair_id = $1 AND date >= $2 AND date < $3
                    ORDER BY date DESC
                    "#,
                )
                .bind(pair_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            DateFilter::ExactTimestamp(ts) => {
                // 嚴格等值比對，無容許窗口
                sqlx::query_as::<_, ExchangeRate>(
                    r#"
                    SELECT id, pair_id, rate, date
                    FROM currency_exchange_rate
                    WHERE pair_id = $1 AND date = $2
                    ORDER BY date DESC
                    "#,
                )
                .bind(pair_id)
                .bind(ts.and_utc())
                .fetch_all(&self.pool)
                .await?
            }
            DateFilter::Range(from, to) => {
                sqlx::query_as::<_, ExchangeRate>(
                    r#"
                    SELECT id, pair_id, rate, date
                    FROM currency_exchange_rate
                    WHERE pair_id = $1 AND date BETWEEN $2 AND $3
                    ORDER BY date DESC
                    "#,
                )
                .bind(pair_id)
                .bind(from.and_utc())
                .bind(to.and_utc())
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }
}
