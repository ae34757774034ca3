use std::time::Duration;

use crate::error::{Error, Result};

/// 通用 JSON API 客戶端
///
/// 包裝 reqwest：非 2xx、傳輸錯誤與無法解析的回應主體
/// 一律以 `Error::UpstreamApi` 回報，附帶狀態碼與原始內容。
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::UpstreamApi {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

impl ApiClient {
    /// 創建新的 API 客戶端
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// 發送 GET 請求並解析 JSON 回應
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::UpstreamApi {
                status: Some(status.as_u16()),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| Error::UpstreamApi {
            status: Some(status.as_u16()),
            body: format!("invalid JSON response: {err}"),
        })
    }
}
