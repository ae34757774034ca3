pub mod client;
pub mod currency_api;
pub mod models;

// 重新導出常用類型
pub use client::ApiClient;
pub use currency_api::{CurrencyApiClient, RateProvider};
pub use models::CurrencyMetadata;

#[cfg(test)]
pub use currency_api::MockRateProvider;
