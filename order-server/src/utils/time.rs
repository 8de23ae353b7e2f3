//! 时间工具函数 — 业务时区转换
//!
//! 日志日期键与打烊时段判断统一使用同一个业务时区，
//! repository 层只接收 `i64` Unix millis。

use chrono_tz::Tz;

/// 今日日期键 (YYYY-MM-DD, 业务时区)
///
/// 点数日志与菜品销量日志共用同一个键，保证两张日账本落在同一天。
pub fn today_date_key(tz: Tz) -> String {
    chrono::Utc::now()
        .with_timezone(&tz)
        .format("%Y-%m-%d")
        .to_string()
}

/// 当前业务时区的"分钟数" (0..1440)
pub fn current_minute_of_day(tz: Tz) -> u32 {
    use chrono::Timelike;
    let now = chrono::Utc::now().with_timezone(&tz);
    now.hour() * 60 + now.minute()
}

/// 现在 + n 天 → Unix millis (TTL 截止时间)
pub fn millis_after_days(days: i64) -> i64 {
    shared::util::now_millis() + days * 86_400_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_shape() {
        let key = today_date_key(chrono_tz::Asia::Shanghai);
        assert_eq!(key.len(), 10);
        assert_eq!(&key[4..5], "-");
    }

    #[test]
    fn minute_of_day_in_range() {
        let m = current_minute_of_day(chrono_tz::Asia::Shanghai);
        assert!(m < 1440);
    }

    #[test]
    fn ttl_is_in_the_future() {
        assert!(millis_after_days(30) > shared::util::now_millis());
    }
}
