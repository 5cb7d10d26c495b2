// ==========================================
// 清洁炉灶安装档案系统 - 投运天数计算
// ==========================================
// 职责: 日期解析 + 整天数差计算
// 红线: 无状态,纯函数,评估日期由调用方显式传入
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 解析投运日期字符串
///
/// 兼容纯日期与带时间分量的写法；时间分量一律截断到当日零点，
/// 避免时区/夏令时漂移造成的差一天问题。
///
/// # 支持格式
/// - `YYYY-MM-DD` / `YYYY/MM/DD` / `YYYYMMDD`
/// - RFC3339（如 `2025-06-21T08:30:00Z`）
/// - `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`
///
/// # 返回
/// - Ok(NaiveDate): 日历日期
/// - Err(EngineError::InvalidDate): 所有格式均解析失败
pub fn parse_commissioning_date(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }

    Err(EngineError::InvalidDate {
        value: value.to_string(),
    })
}

/// 计算投运至评估日的整天数
///
/// 口径: `ceil((评估日零点 - 投运日零点) / 1天)`，下限 0。
/// 两端都已归一化到零点，差值恰为整天数，ceil 即带符号天数本身：
/// 同一天为 0（不是 1），投运日期在未来为 0（无负天数）。
///
/// # 参数
/// - commissioning: 投运日期
/// - evaluation: 评估日期（调用方时钟，测试可注入固定值）
pub fn elapsed_days(commissioning: NaiveDate, evaluation: NaiveDate) -> i64 {
    (evaluation - commissioning).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_formats() {
        assert_eq!(
            parse_commissioning_date("2025-06-21").unwrap(),
            date(2025, 6, 21)
        );
        assert_eq!(
            parse_commissioning_date("2025/06/21").unwrap(),
            date(2025, 6, 21)
        );
        assert_eq!(
            parse_commissioning_date("20250621").unwrap(),
            date(2025, 6, 21)
        );
        assert_eq!(
            parse_commissioning_date("  2025-06-21  ").unwrap(),
            date(2025, 6, 21)
        );
    }

    #[test]
    fn test_parse_with_time_component() {
        // 时间分量被截断，不影响日历日期
        assert_eq!(
            parse_commissioning_date("2025-06-21T23:59:59Z").unwrap(),
            date(2025, 6, 21)
        );
        assert_eq!(
            parse_commissioning_date("2025-06-21T08:30:00").unwrap(),
            date(2025, 6, 21)
        );
        assert_eq!(
            parse_commissioning_date("2025-06-21 08:30:00").unwrap(),
            date(2025, 6, 21)
        );
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(matches!(
            parse_commissioning_date("not-a-date"),
            Err(EngineError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_commissioning_date("2025-13-45"),
            Err(EngineError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_commissioning_date(""),
            Err(EngineError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_elapsed_days_basic() {
        assert_eq!(elapsed_days(date(2025, 6, 21), date(2025, 7, 1)), 10);
        assert_eq!(elapsed_days(date(2025, 6, 21), date(2025, 6, 22)), 1);
    }

    #[test]
    fn test_elapsed_days_same_day_is_zero() {
        assert_eq!(elapsed_days(date(2025, 6, 21), date(2025, 6, 21)), 0);
    }

    #[test]
    fn test_elapsed_days_future_commissioning_clamped() {
        assert_eq!(elapsed_days(date(2025, 7, 1), date(2025, 6, 21)), 0);
    }

    #[test]
    fn test_elapsed_days_monotonic() {
        let commissioning = date(2025, 6, 21);
        let mut prev = 0;
        for offset in 0..60 {
            let eval = commissioning + chrono::Duration::days(offset);
            let days = elapsed_days(commissioning, eval);
            assert!(days >= prev);
            prev = days;
        }
    }
}
