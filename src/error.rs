use thiserror::Error;

/// 系統統一錯誤類型
///
/// 互動式命令路徑將錯誤傳遞到邊界並轉換為退出狀態與訊息；
/// worker 的逐交易對循環會抑制 `UpstreamApi` 與 `NotFound`，
/// 只有 `Infrastructure`（鎖檔/停止檔 I/O 失敗）視為致命。
#[derive(Error, Debug)]
pub enum Error {
    /// 輸入驗證失敗，不重試
    #[error("{0}")]
    Validation(String),

    /// 查無資料（貨幣、交易對或 ID）
    #[error("{0}")]
    NotFound(String),

    /// 上游匯率 API 錯誤（非 2xx、傳輸失敗或回應格式錯誤）
    #[error("API error{}: {body}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    UpstreamApi { status: Option<u16>, body: String },

    /// 無法解析的日期字串，原樣回報輸入
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// 日期區間顛倒（結束早於開始）
    #[error("End date must be after start date: {from} .. {to}")]
    InvalidRange { from: String, to: String },

    /// 資料庫操作失敗
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 鎖檔/停止檔等執行環境 I/O 失敗，不可恢復
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
