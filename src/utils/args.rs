use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(arg: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(arg.trim(), "%Y-%m-%d")
        .map_err(|_| format!("❌ Invalid date: '{}'. Use YYYY-MM-DD, e.g. 2024-01-07", arg))
}

/// Parse a participant id, accepting an optional leading `#`
pub fn parse_user_id(arg: &str) -> Result<i64, String> {
    arg.trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| format!("❌ Invalid participant id: '{}'", arg))
}

/// Parse an optional page argument such as `2` or `p2`
pub fn parse_page(arg: Option<&str>) -> Result<usize, String> {
    match arg {
        None => Ok(1),
        Some(raw) => {
            let lower = raw.to_lowercase();
            lower
                .strip_prefix('p')
                .unwrap_or(&lower)
                .parse::<usize>()
                .map_err(|_| format!("❌ Invalid page number: '{}'", raw))
        }
    }
}
