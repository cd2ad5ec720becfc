// ==========================================
// 设施预测性维护 - 仓储行映射工具
// ==========================================
// 时间统一存储为 RFC3339 (UTC, 微秒, 'Z' 后缀)，保证字符串可按时间排序
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// 时间 → 存储字符串
pub fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 存储字符串 → 时间（用于 row 映射闭包）
pub fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 可空时间列
pub fn parse_opt_ts(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_ts(idx, &s)).transpose()
}

/// 枚举列解析失败时构造转换错误
pub fn parse_enum<T>(idx: usize, raw: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("无法识别的枚举值: {}", raw).into(),
        )
    })
}

/// JSON 数组列（技能、配件）
pub fn parse_string_list(idx: usize, raw: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ts_format_is_sortable() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert!(format_ts(&a) < format_ts(&b));
        assert_eq!(parse_ts(0, &format_ts(&a)).unwrap(), a);
    }

    #[test]
    fn test_parse_enum_error() {
        let result = parse_enum(3, "bogus", crate::domain::TaskStatus::from_db_str);
        assert!(result.is_err());
    }
}
