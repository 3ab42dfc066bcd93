//! Projection of (filtered snapshot × selection) into table rows.
//!
//! Pure data: the ratatui renderer maps these rows onto styled cells, so
//! highlighting and threshold flags are testable without a terminal.

use crate::constants::NO_MATCHES_TEXT;
use crate::models::{ProcessColumn, ProcessRecord};

use super::selection::SelectionSet;

/// CPU / MEM percentages above which a cell is flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// A run of cell text, highlighted when it matched the search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub column: ProcessColumn,
    pub segments: Vec<Segment>,
    /// Above the CPU or MEM threshold.
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub selected: bool,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    /// Shown alone when no record survives the filter.
    Placeholder(&'static str),
    Process(ProcessRow),
}

/// Build the rows for `visible` records.
///
/// `query` is the applied search text; when non-empty every cell is split
/// so that each case-insensitive occurrence is highlighted.
pub fn project(
    visible: &[&ProcessRecord],
    selection: &SelectionSet,
    query: &str,
    thresholds: Thresholds,
) -> Vec<TableRow> {
    if visible.is_empty() {
        return vec![TableRow::Placeholder(NO_MATCHES_TEXT)];
    }
    let query_lower = query.to_lowercase();

    visible
        .iter()
        .map(|record| {
            let cells = ProcessColumn::ALL
                .iter()
                .map(|&column| {
                    let text = record.column_text(column);
                    let flagged = match column {
                        ProcessColumn::Cpu => exceeds(record.cpu_percent(), thresholds.cpu_percent),
                        ProcessColumn::Mem => exceeds(record.mem_percent(), thresholds.mem_percent),
                        _ => false,
                    };
                    CellView {
                        column,
                        segments: highlight(&text, &query_lower),
                        flagged,
                    }
                })
                .collect();
            TableRow::Process(ProcessRow {
                pid: record.pid,
                selected: selection.contains(record.pid),
                cells,
            })
        })
        .collect()
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// Split `text` into plain and highlighted segments for every
/// non-overlapping occurrence of `query_lower`, keeping the original case.
pub fn highlight(text: &str, query_lower: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    if query_lower.is_empty() {
        if !text.is_empty() {
            segments.push(Segment {
                text: text.to_string(),
                highlighted: false,
            });
        }
        return segments;
    }

    let mut last = 0;
    let mut from = 0;
    while let Some((start, end)) = find_case_insensitive(text, query_lower, from) {
        if start > last {
            segments.push(Segment {
                text: text[last..start].to_string(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: text[start..end].to_string(),
            highlighted: true,
        });
        last = end;
        from = end;
    }
    if last < text.len() {
        segments.push(Segment {
            text: text[last..].to_string(),
            highlighted: false,
        });
    }
    segments
}

/// Byte range of the first occurrence of `needle_lower` in `haystack` at or
/// after byte offset `from`, comparing lower-cased characters. Ranges always
/// fall on char boundaries of the original text.
fn find_case_insensitive(haystack: &str, needle_lower: &str, from: usize) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle_lower.chars().collect();
    haystack[from..].char_indices().find_map(|(offset, _)| {
        let start = from + offset;
        match_len_at(&haystack[start..], &needle).map(|len| (start, start + len))
    })
}

/// Byte length of the shortest prefix of `text` whose lower-cased chars
/// contain `needle`, starting at the beginning of the first char's
/// lower-case form or inside it (`İ` lower-cases to two chars).
fn match_len_at(text: &str, needle: &[char]) -> Option<usize> {
    let first_len = text.chars().next()?.to_lowercase().count();
    (0..first_len).find_map(|skip| match_len_skipping(text, needle, skip))
}

fn match_len_skipping(text: &str, needle: &[char], skip: usize) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in text.char_indices() {
        let skip = if offset == 0 { skip } else { 0 };
        for lower in ch.to_lowercase().skip(skip) {
            if matched == needle.len() {
                break; // needle ends inside this char's expansion
            }
            if needle[matched] != lower {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use crate::peek::test_support::make_record;

    const T: Thresholds = Thresholds {
        cpu_percent: 10.0,
        mem_percent: 10.0,
    };

    fn plain(text: &str) -> Segment {
        Segment {
            text: text.into(),
            highlighted: false,
        }
    }

    fn hit(text: &str) -> Segment {
        Segment {
            text: text.into(),
            highlighted: true,
        }
    }

    #[test]
    fn empty_visible_set_renders_one_placeholder() {
        let rows = project(&[], &SelectionSet::new(), "zzz", T);
        assert_eq!(rows, vec![TableRow::Placeholder(NO_MATCHES_TEXT)]);
    }

    #[test]
    fn rows_reflect_selection() {
        let a = make_record(1, "root", "init");
        let b = make_record(2, "me", "bash");
        let mut sel = SelectionSet::new();
        sel.add(2);
        let rows = project(&[&a, &b], &sel, "", T);
        let marks: Vec<(u32, bool)> = rows
            .iter()
            .map(|r| match r {
                TableRow::Process(p) => (p.pid, p.selected),
                TableRow::Placeholder(_) => panic!("unexpected placeholder"),
            })
            .collect();
        assert_eq!(marks, vec![(1, false), (2, true)]);
    }

    #[test]
    fn cpu_and_mem_flagged_above_threshold() {
        let mut r = make_record(1, "me", "stress");
        r.cpu = FieldValue::Float(10.5);
        r.mem = FieldValue::Text("10".into()); // exactly at threshold: not flagged
        let rows = project(&[&r], &SelectionSet::new(), "", T);
        let TableRow::Process(row) = &rows[0] else {
            panic!("expected a process row")
        };
        let flagged: Vec<ProcessColumn> = row
            .cells
            .iter()
            .filter(|c| c.flagged)
            .map(|c| c.column)
            .collect();
        assert_eq!(flagged, vec![ProcessColumn::Cpu]);
    }

    #[test]
    fn highlight_preserves_case() {
        assert_eq!(
            highlight("Python app.PY", "py"),
            vec![hit("Py"), plain("thon app."), hit("PY")]
        );
    }

    #[test]
    fn highlight_without_query_is_plain() {
        assert_eq!(highlight("nginx", ""), vec![plain("nginx")]);
        assert!(highlight("", "").is_empty());
    }

    #[test]
    fn highlight_no_match_is_single_plain_segment() {
        assert_eq!(highlight("nginx", "py"), vec![plain("nginx")]);
    }

    #[test]
    fn highlight_whole_text() {
        assert_eq!(highlight("ROOT", "root"), vec![hit("ROOT")]);
    }

    #[test]
    fn highlight_non_overlapping() {
        assert_eq!(highlight("aaaa", "aa"), vec![hit("aa"), hit("aa")]);
    }

    #[test]
    fn highlight_handles_multibyte_text() {
        assert_eq!(
            highlight("Ärger über ÄRGER", "ärger"),
            vec![hit("Ärger"), plain(" über "), hit("ÄRGER")]
        );
    }

    #[test]
    fn highlighted_cells_keep_full_text() {
        let r = make_record(200, "me", "python app.py");
        let rows = project(&[&r], &SelectionSet::new(), "PY", T);
        let TableRow::Process(row) = &rows[0] else {
            panic!("expected a process row")
        };
        let cmd = row
            .cells
            .iter()
            .find(|c| c.column == ProcessColumn::Command)
            .unwrap();
        let text: String = cmd.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "python app.py");
        assert_eq!(cmd.segments.iter().filter(|s| s.highlighted).count(), 2);
    }

    #[test]
    fn expanding_lowercase_chars_are_highlighted() {
        // 'İ' lower-cases to "i\u{307}"; the filter keeps rows matching either part
        let segs = highlight("İstanbul", "i");
        assert_eq!(segs[0].text, "İ");
        assert!(segs[0].highlighted);

        let segs = highlight("xİ", "\u{307}");
        assert_eq!(
            segs,
            vec![
                Segment {
                    text: "x".into(),
                    highlighted: false
                },
                Segment {
                    text: "İ".into(),
                    highlighted: true
                },
            ]
        );

        let r = make_record(300, "me", "İstanbul");
        assert_eq!(crate::peek::filter::filter(&[r.clone()], "i"), vec![0]);
        let rows = project(&[&r], &SelectionSet::new(), "i", T);
        let TableRow::Process(row) = &rows[0] else {
            panic!("expected a process row")
        };
        assert!(row
            .cells
            .iter()
            .any(|c| c.segments.iter().any(|s| s.highlighted)));
    }
}
