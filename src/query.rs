pub mod date_filter;
pub mod engine;

// 重新導出常用類型
pub use date_filter::DateFilter;
pub use engine::{RateQueryEngine, RateQueryResult};
