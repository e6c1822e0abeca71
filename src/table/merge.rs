//! Keyed joins between two tables.

use super::Table;
use crate::error::PipelineError;
use std::collections::{HashMap, HashSet};

/// Which rows survive a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Every row of both sides, matched where keys align.
    Outer,
    /// Every row of the right side, with matching left rows attached.
    Right,
}

/// Suffix for overlapping non-key columns from the left table.
const LEFT_SUFFIX: &str = "_x";
/// Suffix for overlapping non-key columns from the right table.
const RIGHT_SUFFIX: &str = "_y";

/// Join two tables on equal values of the `keys` columns.
///
/// Duplicate keys produce every pairing. Key columns appear once, at their
/// position in the left table; non-key columns present on both sides get
/// `_x` / `_y` suffixes. Outer joins emit left rows in order followed by
/// unmatched right rows; right joins follow right row order.
pub fn merge(
    left: &Table,
    right: &Table,
    keys: &[&str],
    how: JoinKind,
) -> Result<Table, PipelineError> {
    let left_keys = keys
        .iter()
        .map(|k| left.require_column(k))
        .collect::<Result<Vec<_>, _>>()?;
    let right_keys = keys
        .iter()
        .map(|k| right.require_column(k))
        .collect::<Result<Vec<_>, _>>()?;

    let right_extra: Vec<usize> = (0..right.columns.len())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let columns = merged_columns(left, right, &left_keys, &right_extra);
    let mut out = Table::new(columns).with_origin(format!(
        "merge of {} and {}",
        left.origin, right.origin
    ));

    let layout = RowLayout {
        left_width: left.columns.len(),
        left_keys: &left_keys,
        right_keys: &right_keys,
        right_extra: &right_extra,
    };

    match how {
        JoinKind::Outer => {
            let index = key_index(right, &right_keys);
            let mut matched: HashSet<usize> = HashSet::new();

            for l in &left.rows {
                match index.get(&key_of(l, &left_keys)) {
                    Some(hits) => {
                        for &r in hits {
                            matched.insert(r);
                            out.rows.push(layout.combine(Some(l), Some(&right.rows[r])));
                        }
                    }
                    None => out.rows.push(layout.combine(Some(l), None)),
                }
            }

            for (r, row) in right.rows.iter().enumerate() {
                if !matched.contains(&r) {
                    out.rows.push(layout.combine(None, Some(row)));
                }
            }
        }
        JoinKind::Right => {
            let index = key_index(left, &left_keys);

            for r in &right.rows {
                match index.get(&key_of(r, &right_keys)) {
                    Some(hits) => {
                        for &l in hits {
                            out.rows.push(layout.combine(Some(&left.rows[l]), Some(r)));
                        }
                    }
                    None => out.rows.push(layout.combine(None, Some(r))),
                }
            }
        }
    }

    Ok(out)
}

fn merged_columns(
    left: &Table,
    right: &Table,
    left_keys: &[usize],
    right_extra: &[usize],
) -> Vec<String> {
    let left_names: HashSet<&str> = left
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| !left_keys.contains(i))
        .map(|(_, c)| c.as_str())
        .collect();
    let right_names: HashSet<&str> = right_extra
        .iter()
        .map(|&i| right.columns[i].as_str())
        .collect();

    let mut columns: Vec<String> = left
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if !left_keys.contains(&i) && right_names.contains(c.as_str()) {
                format!("{}{}", c, LEFT_SUFFIX)
            } else {
                c.clone()
            }
        })
        .collect();

    columns.extend(right_extra.iter().map(|&i| {
        let c = &right.columns[i];
        if left_names.contains(c.as_str()) {
            format!("{}{}", c, RIGHT_SUFFIX)
        } else {
            c.clone()
        }
    }));

    columns
}

fn key_of<'a>(row: &'a [String], keys: &[usize]) -> Vec<&'a str> {
    keys.iter().map(|&k| row[k].as_str()).collect()
}

fn key_index<'a>(table: &'a Table, keys: &[usize]) -> HashMap<Vec<&'a str>, Vec<usize>> {
    let mut index: HashMap<Vec<&str>, Vec<usize>> = HashMap::new();
    for (i, row) in table.rows.iter().enumerate() {
        index.entry(key_of(row, keys)).or_default().push(i);
    }
    index
}

/// How a left row and a right row are laid out in a merged row.
struct RowLayout<'a> {
    left_width: usize,
    left_keys: &'a [usize],
    right_keys: &'a [usize],
    right_extra: &'a [usize],
}

impl RowLayout<'_> {
    fn combine(&self, left: Option<&Vec<String>>, right: Option<&Vec<String>>) -> Vec<String> {
        let mut row = match left {
            Some(l) => l.clone(),
            None => {
                let mut blank = vec![String::new(); self.left_width];
                if let Some(r) = right {
                    for (&lk, &rk) in self.left_keys.iter().zip(self.right_keys) {
                        blank[lk] = r[rk].clone();
                    }
                }
                blank
            }
        };

        match right {
            Some(r) => row.extend(self.right_extra.iter().map(|&i| r[i].clone())),
            None => row.extend(std::iter::repeat(String::new()).take(self.right_extra.len())),
        }

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::COMMA;

    fn parse(text: &str) -> Table {
        Table::from_reader(text.as_bytes(), COMMA, "test").unwrap()
    }

    #[test]
    fn test_outer_keeps_both_sides() {
        let left = parse("key,qc\na,1\nb,2\n");
        let right = parse("key,lineage\nb,B.1\nc,C.1\n");
        let out = merge(&left, &right, &["key"], JoinKind::Outer).unwrap();

        assert_eq!(out.columns(), ["key", "qc", "lineage"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out.rows()[0], vec!["a", "1", ""]);
        assert_eq!(out.rows()[1], vec!["b", "2", "B.1"]);
        assert_eq!(out.rows()[2], vec!["c", "", "C.1"]);
    }

    #[test]
    fn test_outer_on_composite_key() {
        let left = parse("k1,k2,qc\na,1,x\na,2,y\n");
        let right = parse("k2,k1\n2,a\n3,a\n");
        let out = merge(&left, &right, &["k1", "k2"], JoinKind::Outer).unwrap();

        assert_eq!(out.columns(), ["k1", "k2", "qc"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out.rows()[2], vec!["a", "3", ""]);
    }

    #[test]
    fn test_duplicate_keys_pair_up() {
        let left = parse("key,qc\na,1\na,2\n");
        let right = parse("key,lineage\na,A.1\n");
        let out = merge(&left, &right, &["key"], JoinKind::Outer).unwrap();
        assert_eq!(out.len(), 2);

        let right = parse("key,lineage\na,A.1\na,A.2\n");
        let out = merge(&left, &right, &["key"], JoinKind::Outer).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_right_follows_right_rows() {
        let left = parse("key,qc\na,1\nb,2\n");
        let right = parse("key,lineage\nb,B.1\nz,Z.1\n");
        let out = merge(&left, &right, &["key"], JoinKind::Right).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0], vec!["b", "2", "B.1"]);
        assert_eq!(out.rows()[1], vec!["z", "", "Z.1"]);
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let left = parse("key,note\na,left\n");
        let right = parse("key,note\na,right\n");
        let out = merge(&left, &right, &["key"], JoinKind::Outer).unwrap();

        assert_eq!(out.columns(), ["key", "note_x", "note_y"]);
        assert_eq!(out.rows()[0], vec!["a", "left", "right"]);
    }

    #[test]
    fn test_missing_key_column_fails() {
        let left = parse("key\na\n");
        let right = parse("other\na\n");
        let err = merge(&left, &right, &["key"], JoinKind::Outer).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }
}
