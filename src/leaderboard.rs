use crate::models::HelperTally;

pub const DEFAULT_LIMIT: usize = 10;

/// Adds one helped task to `nickname`'s count and returns the new count.
pub fn record_help(tally: &mut HelperTally, nickname: &str) -> u32 {
    let count = tally.entry(nickname.to_string()).or_insert(0);
    *count = count.saturating_add(1);
    *count
}

/// Top helpers by count, highest first, at most `limit` entries.
///
/// Order among equal counts is unspecified.
pub fn top_helpers(tally: &HelperTally, limit: usize) -> Vec<(String, u32)> {
    let mut entries: Vec<(String, u32)> = tally
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_help_starts_at_one() {
        let mut tally = HelperTally::new();
        assert_eq!(record_help(&mut tally, "Sam"), 1);
        assert_eq!(record_help(&mut tally, "Sam"), 2);
    }

    #[test]
    fn zero_limit_is_empty() {
        let mut tally = HelperTally::new();
        tally.insert("Ana".into(), 1);
        assert!(top_helpers(&tally, 0).is_empty());
    }
}
