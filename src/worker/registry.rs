use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::worker::lifecycle::{Worker, WorkerLifecycle};

/// worker 註冊表
///
/// 名稱到實現的顯式對照表；控制面以名稱與動作字串操作，
/// 未知名稱或動作屬使用方式錯誤而非崩潰。
pub struct WorkerRegistry {
    lifecycle: WorkerLifecycle,
    workers: HashMap<String, Box<dyn Worker>>,
}

impl WorkerRegistry {
    pub fn new(lifecycle: WorkerLifecycle) -> Self {
        Self {
            lifecycle,
            workers: HashMap::new(),
        }
    }

    /// 註冊一個 worker
    pub fn register(&mut self, worker: Box<dyn Worker>) {
        let name = worker.name().to_string();
        self.workers.insert(name, worker);
    }

    /// 已註冊的 worker 名稱（排序後）
    pub fn available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// worker 是否執行中（以鎖檔判定）
    pub fn is_running(&self, name: &str) -> bool {
        self.lifecycle.is_running(name)
    }

    /// 控制指定 worker
    ///
    /// `action` 為 "on"（啟動，可選迭代上限與間隔覆寫）或
    /// "off"（請求優雅停止）。
    pub async fn control(
        &mut self,
        name: &str,
        action: &str,
        iterations: Option<u64>,
        interval_secs: Option<u64>,
    ) -> Result<()> {
        if !self.workers.contains_key(name) {
            let available = self.available();
            let listing = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };

            return Err(Error::Validation(format!(
                "Worker \"{name}\" not found. Available workers: {listing}"
            )));
        }

        match action {
            "on" => {
                // 名稱已驗證存在
                if let Some(worker) = self.workers.get_mut(name) {
                    if let Some(secs) = interval_secs {
                        worker.set_sleep_interval(Duration::from_secs(secs));
                    }

                    self.lifecycle.start(worker.as_ref(), iterations).await?;
                }

                Ok(())
            }
            "off" => self.lifecycle.stop(name).await,
            other => Err(Error::Validation(format!(
                "Invalid action \"{other}\". Valid actions are: on, off"
            ))),
        }
    }
}
