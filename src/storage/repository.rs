// 重新導出子模塊
pub mod currency;
pub mod currency_pair;
pub mod exchange_rate;

// 重新導出常用類型
pub use currency::{CurrencyRepository, PgCurrencyRepository};
pub use currency_pair::{CurrencyPairRepository, PgCurrencyPairRepository};
pub use exchange_rate::{ExchangeRateRepository, PgExchangeRateRepository};
