/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a random document id.
///
/// 20 lowercase-alphanumeric characters, URL-safe, usable both as a primary
/// key and as a point-card code typed in by a restaurant admin.
pub fn new_doc_id() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..20)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Unix millis → ISO-8601 UTC string（API 边界统一使用 ISO 字符串）
pub fn millis_to_iso(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_ids_are_unique_enough() {
        let a = new_doc_id();
        let b = new_doc_id();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
    }

    #[test]
    fn millis_round_trip_to_iso() {
        let iso = millis_to_iso(1_704_067_200_000);
        assert!(iso.starts_with("2024-01-01T00:00:00"));
    }
}
