//! Conjunctive fuzzy holder-name search.
//!
//! Each predicate is a case-insensitive substring match against holder
//! names. A stock qualifies only if it has at least one matching row for
//! every predicate (not necessarily the same row); the emitted rows are all
//! matching rows of qualifying stocks, deduplicated, in dataset order.

use crate::domain::dataset::dedup_rows;
use crate::domain::error::HolderscanError;
use crate::domain::record::HolderRecord;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default)]
pub struct QueryOutcome {
    pub predicates: Vec<String>,
    /// Stock codes satisfying every predicate.
    pub codes: BTreeSet<String>,
    pub rows: Vec<HolderRecord>,
}

impl QueryOutcome {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn query(
    predicates: &[String],
    dataset: &[HolderRecord],
) -> Result<QueryOutcome, HolderscanError> {
    if predicates.iter().any(|p| p.trim().is_empty()) {
        return Err(HolderscanError::InvalidPredicate {
            reason: "empty predicate string".into(),
        });
    }
    if predicates.is_empty() {
        // No predicates never means "match everything".
        return Ok(QueryOutcome::default());
    }

    let needles: Vec<String> = predicates.iter().map(|p| p.to_lowercase()).collect();

    // One pass over the dataset builds every per-predicate candidate set;
    // the row mask remembers which rows matched anything at all.
    let mut candidates: Vec<HashSet<&str>> = vec![HashSet::new(); needles.len()];
    let mut matched = vec![false; dataset.len()];
    for (ri, row) in dataset.iter().enumerate() {
        let name = row.holder_name.to_lowercase();
        for (pi, needle) in needles.iter().enumerate() {
            if name.contains(needle.as_str()) {
                candidates[pi].insert(row.ts_code.as_str());
                matched[ri] = true;
            }
        }
    }

    let mut sets = candidates.into_iter();
    let mut common = sets.next().unwrap_or_default();
    for set in sets {
        common.retain(|code| set.contains(code));
    }

    let rows = dedup_rows(
        dataset
            .iter()
            .enumerate()
            .filter(|(ri, row)| matched[*ri] && common.contains(row.ts_code.as_str()))
            .map(|(_, row)| row.clone())
            .collect(),
    );

    Ok(QueryOutcome {
        predicates: predicates.to_vec(),
        codes: common.into_iter().map(str::to_string).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, holder: &str) -> HolderRecord {
        HolderRecord {
            ts_code: code.to_string(),
            holder_name: holder.to_string(),
            end_date: "20240331".into(),
            ann_date: "20240428".into(),
            hold_amount: "100".into(),
            hold_ratio: "1.0".into(),
        }
    }

    fn preds(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> Vec<HolderRecord> {
        vec![
            row("id1", "Alpha Fund"),
            row("id2", "Beta Alpha Corp"),
            row("id3", "Beta Corp"),
        ]
    }

    #[test]
    fn conjunction_is_an_intersection_not_a_union() {
        let outcome = query(&preds(&["alpha", "beta"]), &fixture()).unwrap();
        assert_eq!(
            outcome.codes.iter().collect::<Vec<_>>(),
            vec![&"id2".to_string()]
        );
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].holder_name, "Beta Alpha Corp");
    }

    #[test]
    fn single_predicate_degenerates_to_its_candidate_set() {
        let outcome = query(&preds(&["alpha"]), &fixture()).unwrap();
        let codes: Vec<&str> = outcome.codes.iter().map(String::as_str).collect();
        assert_eq!(codes, vec!["id1", "id2"]);
        assert_eq!(outcome.rows.len(), 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let outcome = query(&preds(&["ALPHA"]), &fixture()).unwrap();
        assert_eq!(outcome.codes.len(), 2);
        let outcome = query(&preds(&["bEtA"]), &fixture()).unwrap();
        assert_eq!(outcome.codes.len(), 2);
    }

    #[test]
    fn qualifying_code_brings_all_its_matching_rows_but_not_others() {
        let dataset = vec![
            row("id2", "Beta Pension Plan"),
            row("id2", "Alpha Fund"),
            row("id2", "Gamma Trust"),
            row("id3", "Beta Corp"),
        ];
        let outcome = query(&preds(&["alpha", "beta"]), &dataset).unwrap();
        assert_eq!(outcome.codes.len(), 1);
        // Both matching rows of id2 are included, the Gamma row is not,
        // and dataset order is preserved.
        let names: Vec<&str> = outcome.rows.iter().map(|r| r.holder_name.as_str()).collect();
        assert_eq!(names, vec!["Beta Pension Plan", "Alpha Fund"]);
    }

    #[test]
    fn result_rows_are_full_row_deduplicated() {
        let dataset = vec![
            row("id1", "Alpha Fund"),
            row("id1", "Alpha Fund"),
        ];
        let outcome = query(&preds(&["alpha"]), &dataset).unwrap();
        assert_eq!(outcome.rows.len(), 1);
    }

    #[test]
    fn empty_predicate_list_matches_nothing() {
        let outcome = query(&[], &fixture()).unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.codes.is_empty());
    }

    #[test]
    fn blank_predicate_string_is_rejected() {
        assert!(matches!(
            query(&preds(&["alpha", ""]), &fixture()),
            Err(HolderscanError::InvalidPredicate { .. })
        ));
        assert!(matches!(
            query(&preds(&["  "]), &fixture()),
            Err(HolderscanError::InvalidPredicate { .. })
        ));
    }

    #[test]
    fn empty_intersection_is_a_no_match_not_an_error() {
        let outcome = query(&preds(&["alpha", "omega"]), &fixture()).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn blank_holder_name_never_matches() {
        let dataset = vec![row("id1", ""), row("id2", "Alpha Fund")];
        let outcome = query(&preds(&["alpha"]), &dataset).unwrap();
        assert_eq!(outcome.codes.len(), 1);
        assert!(outcome.codes.contains("id2"));
    }
}
