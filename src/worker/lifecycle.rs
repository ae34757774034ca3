use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::Result;

/// 停止等待輪數與輪詢間隔
const STOP_WAIT_ROUNDS: u32 = 5;
const STOP_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 可輪詢的 worker 接口
///
/// 實現者提供名稱、單輪處理與迭代間隔；生命週期控制由
/// `WorkerLifecycle` 統一處理。
#[async_trait::async_trait]
pub trait Worker: Send + Sync {
    /// worker 名稱，同時作為鎖檔/停止檔的檔名
    fn name(&self) -> &str;

    /// 迭代間隔
    fn sleep_interval(&self) -> Duration;

    /// 變更迭代間隔（須在 start 前呼叫）
    fn set_sleep_interval(&mut self, interval: Duration);

    /// 單輪處理
    async fn process(&self) -> Result<()>;
}

/// worker 執行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    StopRequested,
}

/// worker 生命週期協調器
///
/// 以鎖檔/停止檔協調跨進程的啟動與停止：鎖檔存在即視為執行中，
/// 停止檔由 `stop()` 寫入並於每輪迭代開頭檢查。停止為協作式，
/// 無法中斷進行中的 `process()`，只能阻止下一輪。
///
/// 每個 worker 名稱各自一組鎖檔/停止檔，多個具名 worker 可並存
/// 而互不干擾。鎖檔/停止檔的 I/O 失敗視為不可恢復。
pub struct WorkerLifecycle {
    lock_dir: PathBuf,
    state: WorkerState,
}

impl WorkerLifecycle {
    /// 創建生命週期協調器，確保鎖檔目錄存在
    pub fn new(lock_dir: impl Into<PathBuf>) -> Result<Self> {
        let lock_dir = lock_dir.into();

        if !lock_dir.exists() {
            std::fs::create_dir_all(&lock_dir)?;
        }

        Ok(Self {
            lock_dir,
            state: WorkerState::Idle,
        })
    }

    /// 當前進程內的狀態記錄
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// 指定 worker 的鎖檔路徑
    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.lock_dir.join(format!("{name}.lock"))
    }

    /// 指定 worker 的停止檔路徑
    pub fn stop_path(&self, name: &str) -> PathBuf {
        self.lock_dir.join(format!("{name}.stop"))
    }

    /// 鎖檔存在即視為執行中
    ///
    /// 已知限制：worker 異常終止而未清除鎖檔時會被誤報為執行中，
    /// 直到手動清除過期鎖檔為止。
    pub fn is_running(&self, name: &str) -> bool {
        self.lock_path(name).exists()
    }

    /// 啟動 worker 循環
    ///
    /// 已在執行中（鎖檔存在）時為冪等的 no-op。否則寫入帶 PID 的
    /// 鎖檔後進入循環，直到收到停止信號或迭代次數用盡，離開時
    /// 清除鎖檔。
    pub async fn start<W: Worker + ?Sized>(
        &mut self,
        worker: &W,
        iterations: Option<u64>,
    ) -> Result<()> {
        let name = worker.name();
        let lock_path = self.lock_path(name);

        if self.is_running(name) {
            info!("{name} worker is already running");
            return Ok(());
        }

        let pid = std::process::id();
        std::fs::write(&lock_path, pid.to_string())?;
        self.state = WorkerState::Running;

        info!("Starting {name} worker (PID: {pid})");

        let result = self.run_loop(worker, iterations).await;

        if lock_path.exists() {
            std::fs::remove_file(&lock_path)?;
        }
        self.state = WorkerState::Idle;

        info!("{name} worker stopped");

        result
    }

    async fn run_loop<W: Worker + ?Sized>(
        &mut self,
        worker: &W,
        iterations: Option<u64>,
    ) -> Result<()> {
        let name = worker.name();
        let mut count = 0u64;

        while self.should_continue(name) && iterations.map_or(true, |total| count < total) {
            worker.process().await?;

            if let Some(total) = iterations {
                count += 1;
                info!("Completed iteration {count}/{total}");
            }

            if self.should_continue(name) && iterations.map_or(true, |total| count < total) {
                sleep(worker.sleep_interval()).await;
            }
        }

        Ok(())
    }

    /// 請求 worker 優雅停止
    ///
    /// 沒有鎖檔時為 no-op。否則寫入停止檔並等待鎖檔消失
    /// （至多 5 輪、每輪 1 秒），逾時記錄警告；無論結果為何
    /// 最後都移除停止檔。
    pub async fn stop(&mut self, name: &str) -> Result<()> {
        let lock_path = self.lock_path(name);

        if !lock_path.exists() {
            info!("{name} worker is not running");
            return Ok(());
        }

        let stop_path = self.stop_path(name);
        std::fs::write(&stop_path, chrono::Utc::now().timestamp().to_string())?;

        info!("Stop signal sent to {name} worker");

        let mut waited = 0;
        while lock_path.exists() && waited < STOP_WAIT_ROUNDS {
            sleep(STOP_POLL_INTERVAL).await;
            waited += 1;
        }

        if lock_path.exists() {
            warn!("{name} worker did not stop after {STOP_WAIT_ROUNDS} seconds");
        } else {
            info!("{name} worker has been stopped");
        }

        if stop_path.exists() {
            std::fs::remove_file(&stop_path)?;
        }

        Ok(())
    }

    fn should_continue(&mut self, name: &str) -> bool {
        if self.stop_path(name).exists() {
            info!("Stop signal detected for {name} worker");
            self.state = WorkerState::StopRequested;
            return false;
        }

        true
    }
}
