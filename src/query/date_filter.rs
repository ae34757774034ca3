use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

// 接受的日期格式，依序嘗試
const FORMAT_DATETIME_SECONDS: &str = "%Y-%m-%d %H:%M:%S";
const FORMAT_DATETIME_MINUTES: &str = "%Y-%m-%d %H:%M";
const FORMAT_DATE: &str = "%Y-%m-%d";

/// 日期過濾器
///
/// 由使用者輸入的日期/區間字串解析而來。所有時間一律以 UTC 解讀。
///
/// `ExactTimestamp` 採嚴格等值比對，無容許窗口。時間序列由獨立抓取
/// 事件填入，除非呼叫端知道確切儲存時間戳，否則通常比不到任何記錄；
/// 此行為為沿用之既有語意，刻意不放寬。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    /// 僅最新一筆（無任何日期輸入時）
    Latest,
    /// 全部記錄，不加述詞，僅排序
    All,
    /// 單日視窗 `[day 00:00:00, day+1 00:00:00)`
    DayBucket(NaiveDate),
    /// 嚴格等值時間戳
    ExactTimestamp(NaiveDateTime),
    /// 含兩端的閉區間 `[from, to]`
    Range(NaiveDateTime, NaiveDateTime),
}

impl DateFilter {
    /// 解析使用者輸入的日期與可選結束日期
    ///
    /// 規則：
    /// - 兩者皆缺 → `Latest`
    /// - `raw_date` 為 "all"（不分大小寫）→ `All`
    /// - 僅 `raw_date` 且時間部分為零 → `DayBucket`
    /// - 僅 `raw_date` 且帶非零時間 → `ExactTimestamp`
    /// - 兩者皆有 → `Range`，結束早於開始時回報 `InvalidRange`
    pub fn parse(raw_date: Option<&str>, raw_to_date: Option<&str>) -> Result<Self> {
        let raw_date = match raw_date {
            Some(s) => s,
            // 結束日期單獨出現時沿用原行為：忽略並回傳完整歷史
            None if raw_to_date.is_some() => return Ok(DateFilter::All),
            None => return Ok(DateFilter::Latest),
        };

        if raw_date.eq_ignore_ascii_case("all") {
            return Ok(DateFilter::All);
        }

        let from = parse_timestamp(raw_date)?;

        if let Some(raw_to) = raw_to_date {
            let to = parse_timestamp(raw_to)?;

            if to < from {
                return Err(Error::InvalidRange {
                    from: raw_date.to_string(),
                    to: raw_to.to_string(),
                });
            }

            return Ok(DateFilter::Range(from, to));
        }

        if from.time() == NaiveTime::MIN {
            Ok(DateFilter::DayBucket(from.date()))
        } else {
            Ok(DateFilter::ExactTimestamp(from))
        }
    }

    /// 過濾器的人類可讀描述，用於標題與摘要
    pub fn description(&self) -> String {
        match self {
            DateFilter::Latest => "latest".to_string(),
            DateFilter::All => "all available dates".to_string(),
            DateFilter::DayBucket(day) => format!("on {}", day.format(FORMAT_DATE)),
            DateFilter::ExactTimestamp(ts) => {
                format!("at {}", ts.format(FORMAT_DATETIME_SECONDS))
            }
            DateFilter::Range(from, to) => format!(
                "from {} to {}",
                from.format(FORMAT_DATETIME_MINUTES),
                to.format(FORMAT_DATETIME_MINUTES)
            ),
        }
    }
}

/// 解析單一日期字串為時間戳
///
/// 底線視為空白，依序嘗試「日期+秒」、「日期+分」、「純日期」三種格式；
/// 純日期補為當日零時。無法解析時回報原始輸入。
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let normalized = raw.replace('_', " ");
    let normalized = normalized.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(normalized, FORMAT_DATETIME_SECONDS) {
        return Ok(ts);
    }

    if let Ok(ts) = NaiveDateTime::parse_from_str(normalized, FORMAT_DATETIME_MINUTES) {
        return Ok(ts);
    }

    if let Ok(day) = NaiveDate::parse_from_str(normalized, FORMAT_DATE) {
        return Ok(day.and_time(NaiveTime::MIN));
    }

    Err(Error::InvalidDate(raw.to_string()))
}
