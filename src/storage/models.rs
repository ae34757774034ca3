pub mod currency;
pub mod currency_pair;
pub mod exchange_rate;

// 重新匯出常用模型類型
pub use currency::*;
pub use currency_pair::*;
pub use exchange_rate::*;
