use serde::{Deserialize, Serialize};

/// 貨幣模型
///
/// code 為穩定識別（3 碼大寫）；顯示欄位由 fetch-currencies 重新同步覆寫。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Currency {
    pub id: i32,
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub symbol_native: String,
    pub decimal_digits: i16,
    pub rounding: f64,
    pub name_plural: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub currency_type: Option<String>,
}

/// 貨幣插入模型 (不包含自動生成的字段)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyInsert {
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub symbol_native: String,
    pub decimal_digits: i16,
    pub rounding: f64,
    pub name_plural: String,
    pub currency_type: Option<String>,
}
