use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::provider::RateProvider;
use crate::storage::repository::CurrencyRepository;

/// 貨幣同步統計
#[derive(Debug, Default)]
pub struct SyncStats {
    pub added: usize,
    pub updated: usize,
    pub new_codes: Vec<String>,
    pub updated_codes: Vec<String>,
}

/// 貨幣元數據同步服務
///
/// 從上游拉取貨幣清單並逐筆寫入：已存在的貨幣覆寫顯示欄位，
/// 不存在的新建。
pub struct FetchCurrenciesService {
    provider: Arc<dyn RateProvider>,
    currencies: Arc<dyn CurrencyRepository>,
}

impl FetchCurrenciesService {
    pub fn new(provider: Arc<dyn RateProvider>, currencies: Arc<dyn CurrencyRepository>) -> Self {
        Self {
            provider,
            currencies,
        }
    }

    /// 同步貨幣元數據，可依代碼過濾
    pub async fn execute(&self, codes: &[String]) -> Result<SyncStats> {
        let metadata = self.provider.list_currencies(codes).await?;

        // 排序使日誌與統計順序可重現
        let mut entries: Vec<_> = metadata.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut stats = SyncStats::default();

        for (code, meta) in &entries {
            let (_, created) = self.currencies.upsert(code, meta).await?;

            if created {
                stats.added += 1;
                stats.new_codes.push(code.clone());
            } else {
                stats.updated += 1;
                stats.updated_codes.push(code.clone());
            }
        }

        info!(
            added = stats.added,
            updated = stats.updated,
            "currency metadata synchronized"
        );

        Ok(stats)
    }
}
