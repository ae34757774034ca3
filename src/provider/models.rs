use serde::{Deserialize, Serialize};

/// 上游 API 回傳的貨幣元數據
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyMetadata {
    pub symbol: String,
    pub name: String,
    pub symbol_native: String,
    pub decimal_digits: i16,
    pub rounding: f64,
    pub name_plural: String,
    #[serde(rename = "type", default)]
    pub currency_type: Option<String>,
}
