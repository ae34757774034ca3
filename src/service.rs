pub mod currency_sync;
pub mod fetch_rate;
pub mod pair;

// 重新導出常用組件
pub use currency_sync::{FetchCurrenciesService, SyncStats};
pub use fetch_rate::{FetchRateService, FetchedRate};
pub use pair::{ObserveChange, PairCreation, PairService};
