pub mod exchange_rate;
pub mod lifecycle;
pub mod registry;

// 重新導出常用組件
pub use exchange_rate::ExchangeRateWorker;
pub use lifecycle::{Worker, WorkerLifecycle, WorkerState};
pub use registry::WorkerRegistry;
