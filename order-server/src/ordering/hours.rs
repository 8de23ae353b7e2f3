//! 自动打烊时段 (auto-close window)
//!
//! 窗口按"分钟数"比较，起点含、终点不含。起始晚于结束表示跨午夜：
//! `[start, 24:00) ∪ [00:00, end)`。

/// 解析 "HH:MM" → 当日分钟数。格式损坏返回 None，调用方视为窗口不生效。
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h >= 24 || m >= 60 {
        return None;
    }
    Some(h * 60 + m)
}

/// 当前时刻（分钟数）是否落在打烊窗口内
pub fn is_within_window(start: &str, end: &str, now_minutes: u32) -> bool {
    let (Some(start), Some(end)) = (parse_hhmm(start), parse_hhmm(end)) else {
        tracing::warn!(start, end, "Unparseable auto-close window, treating as open");
        return false;
    };
    if start <= end {
        now_minutes >= start && now_minutes < end
    } else {
        // 跨午夜
        now_minutes >= start || now_minutes < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(s: &str) -> u32 {
        parse_hhmm(s).unwrap()
    }

    #[test]
    fn ordinary_window() {
        assert!(is_within_window("01:00", "07:30", minutes("03:00")));
        assert!(!is_within_window("01:00", "07:30", minutes("23:00")));
        assert!(!is_within_window("01:00", "07:30", minutes("00:30")));
    }

    #[test]
    fn wrapping_window_covers_both_sides_of_midnight() {
        assert!(is_within_window("23:00", "06:00", minutes("23:30")));
        assert!(is_within_window("23:00", "06:00", minutes("05:00")));
        assert!(!is_within_window("23:00", "06:00", minutes("12:00")));
    }

    #[test]
    fn window_bounds_are_start_inclusive_end_exclusive() {
        assert!(is_within_window("01:00", "07:30", minutes("01:00")));
        assert!(!is_within_window("01:00", "07:30", minutes("07:30")));
        assert!(is_within_window("23:00", "06:00", minutes("23:00")));
        assert!(!is_within_window("23:00", "06:00", minutes("06:00")));
    }

    #[test]
    fn degenerate_and_broken_windows_stay_open() {
        // start == end: 空窗口
        assert!(!is_within_window("08:00", "08:00", minutes("08:00")));
        assert!(!is_within_window("8am", "07:30", minutes("03:00")));
        assert!(!is_within_window("25:00", "07:30", minutes("03:00")));
    }
}
