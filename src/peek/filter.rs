//! Free-text filtering of a process snapshot.

use crate::models::{ProcessColumn, ProcessRecord};

/// Whether `record` contains `query_lower` (already lower-cased) in any
/// displayed column.
pub fn record_matches(record: &ProcessRecord, query_lower: &str) -> bool {
    ProcessColumn::ALL
        .iter()
        .any(|&col| record.column_text(col).to_lowercase().contains(query_lower))
}

/// Indices of the records matching `query`, in snapshot order.
///
/// Matching is case-insensitive substring search over every column. An
/// empty query keeps every record.
pub fn filter(records: &[ProcessRecord], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let query_lower = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| record_matches(r, &query_lower))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use crate::peek::test_support::make_record;

    fn sample() -> Vec<ProcessRecord> {
        vec![
            make_record(100, "www", "nginx"),
            make_record(200, "me", "python app.py"),
            make_record(300, "root", "PyCharm"),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let s = sample();
        assert_eq!(filter(&s, ""), vec![0, 1, 2]);
    }

    #[test]
    fn query_matches_command_case_insensitively() {
        let s = sample();
        assert_eq!(filter(&s, "PY"), vec![1, 2]);
        assert_eq!(filter(&s, "pycharm"), vec![2]);
    }

    #[test]
    fn query_matches_pid_and_user() {
        let s = sample();
        assert_eq!(filter(&s, "200"), vec![1]);
        assert_eq!(filter(&s, "roo"), vec![2]);
    }

    #[test]
    fn query_matches_numeric_and_state_columns() {
        let mut s = sample();
        s[0].cpu = FieldValue::Float(42.5);
        s[2].s = "Z".to_string();
        assert_eq!(filter(&s, "42.5"), vec![0]);
        assert_eq!(filter(&s, "z"), vec![2]);
    }

    #[test]
    fn no_match_gives_empty() {
        let s = sample();
        assert!(filter(&s, "does-not-exist").is_empty());
    }

    #[test]
    fn filter_is_sound_and_complete() {
        let s = sample();
        for q in ["py", "n", "0", "www", "S", "app", "zzz"] {
            let kept = filter(&s, q);
            let ql = q.to_lowercase();
            for (i, r) in s.iter().enumerate() {
                assert_eq!(
                    kept.contains(&i),
                    record_matches(r, &ql),
                    "query {:?}, pid {}",
                    q,
                    r.pid
                );
            }
            // order preserved
            assert!(kept.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn py_query_keeps_only_python() {
        let s = vec![
            make_record(100, "www", "nginx"),
            make_record(200, "me", "python app.py"),
        ];
        let kept: Vec<u32> = filter(&s, "py").into_iter().map(|i| s[i].pid).collect();
        assert_eq!(kept, vec![200]);
    }
}
