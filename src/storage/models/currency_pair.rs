use serde::{Deserialize, Serialize};

/// 貨幣交易對模型
///
/// (currency_from, currency_to) 為有序組合，至多存在一筆；
/// observe 為 worker 排程依據。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CurrencyPair {
    pub id: i32,
    pub currency_from: i32,
    pub currency_to: i32,
    pub observe: bool,
}

/// 交易對查詢結果（含兩側貨幣代碼與名稱）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PairWithCurrencies {
    pub id: i32,
    pub from_code: String,
    pub from_name: String,
    pub to_code: String,
    pub to_name: String,
    pub observe: bool,
}

impl PairWithCurrencies {
    /// 顯示用標籤，例如 "USD → EUR"
    pub fn label(&self) -> String {
        format!("{} → {}", self.from_code, self.to_code)
    }
}
