pub(crate) const MAX_INDEX_CONCURRENCY: usize = 32;

pub(crate) const CONCURRENCY_ENV: &str = "CODEMAP_INDEX_CONCURRENCY";

fn default_index_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_index_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_INDEX_CONCURRENCY)
}

/// Worker count for parallel extraction.
///
/// An explicit request wins, then `CODEMAP_INDEX_CONCURRENCY`, then the
/// number of available cores. Always within `1..=32`.
pub fn index_concurrency(requested: Option<usize>) -> usize {
    if let Some(workers) = requested {
        return workers.clamp(1, MAX_INDEX_CONCURRENCY);
    }
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_index_concurrency(raw.as_deref(), default_index_concurrency())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_concurrency_defaults_and_clamps() {
        let default_value = default_index_concurrency();
        assert_eq!(parse_index_concurrency(None, default_value), default_value.min(32));
        assert_eq!(parse_index_concurrency(Some("   "), 4), 4);
        assert_eq!(parse_index_concurrency(Some("2"), 4), 2);
        assert_eq!(parse_index_concurrency(Some("0"), 4), 1);
        assert_eq!(
            parse_index_concurrency(Some("999"), 4),
            MAX_INDEX_CONCURRENCY
        );
        assert_eq!(parse_index_concurrency(Some("abc"), 4), 4);
        assert_eq!(parse_index_concurrency(Some(" 5 "), 4), 5);
    }

    #[test]
    fn explicit_request_is_clamped() {
        assert_eq!(index_concurrency(Some(0)), 1);
        assert_eq!(index_concurrency(Some(3)), 3);
        assert_eq!(index_concurrency(Some(500)), MAX_INDEX_CONCURRENCY);
    }
}
