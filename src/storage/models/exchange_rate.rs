use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 匯率記錄模型
///
/// 僅追加的時間序列：每次抓取新增一筆，既有記錄不會被修改或刪除。
/// rate 使用定點十進位（DB 欄位 NUMERIC(20,10)）避免浮點累積誤差。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExchangeRate {
    pub id: i32,
    pub pair_id: i32,
    pub rate: Decimal,
    pub date: DateTime<Utc>,
}
