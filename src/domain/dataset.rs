//! Dataset helpers: stable deduplication and summary stats.

use crate::domain::record::HolderRecord;
use std::collections::HashSet;

/// Drop exact-duplicate rows, keeping the first occurrence of each and
/// preserving the relative order of survivors.
pub fn dedup_rows(rows: Vec<HolderRecord>) -> Vec<HolderRecord> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.clone()) {
            out.push(row);
        }
    }
    out
}

/// Number of distinct stock codes present in the rows.
pub fn unique_codes(rows: &[HolderRecord]) -> usize {
    rows.iter()
        .map(|r| r.ts_code.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(code: &str, holder: &str, period: &str) -> HolderRecord {
        HolderRecord {
            ts_code: code.to_string(),
            holder_name: holder.to_string(),
            end_date: period.to_string(),
            ann_date: "20240428".to_string(),
            hold_amount: "100".to_string(),
            hold_ratio: "1.0".to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let a = row("600519.SH", "Alpha", "20240331");
        let b = row("000001.SZ", "Beta", "20240331");
        let rows = vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()];
        assert_eq!(dedup_rows(rows), vec![a, b]);
    }

    #[test]
    fn dedup_preserves_distinct_periods() {
        let q1 = row("600519.SH", "Alpha", "20240331");
        let q2 = row("600519.SH", "Alpha", "20240630");
        assert_eq!(dedup_rows(vec![q1.clone(), q2.clone()]), vec![q1, q2]);
    }

    #[test]
    fn dedup_empty_is_empty() {
        assert!(dedup_rows(Vec::new()).is_empty());
    }

    #[test]
    fn unique_codes_counts_distinct() {
        let rows = vec![
            row("600519.SH", "Alpha", "20240331"),
            row("600519.SH", "Beta", "20240331"),
            row("000001.SZ", "Alpha", "20240331"),
        ];
        assert_eq!(unique_codes(&rows), 2);
        assert_eq!(unique_codes(&[]), 0);
    }

    proptest! {
        #[test]
        fn dedup_is_idempotent(
            seeds in proptest::collection::vec((0u8..4, 0u8..4, 0u8..3), 0..40)
        ) {
            let rows: Vec<HolderRecord> = seeds
                .into_iter()
                .map(|(c, h, p)| row(
                    &format!("00000{}.SZ", c),
                    &format!("Holder {}", h),
                    &format!("2024{:02}31", p + 1),
                ))
                .collect();
            let once = dedup_rows(rows);
            let twice = dedup_rows(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
