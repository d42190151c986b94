//! Grouping of an edit script into unified-diff hunks

use crate::artifacts::diff::diff_algorithm::Edit;

/// Unchanged lines kept around each change
pub const HUNK_CONTEXT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    /// Zero-based index of the first old line covered
    pub a_start: usize,
    /// Zero-based index of the first new line covered
    pub b_start: usize,
    pub edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Split `edits` into hunks with `context` unchanged lines on each side
    ///
    /// Changes separated by at most `2 * context` unchanged lines share a hunk.
    pub fn filter(edits: &[Edit<T>], context: usize) -> Vec<Hunk<T>> {
        // line positions on both sides before each edit
        let mut positions = Vec::with_capacity(edits.len());
        let (mut a_line, mut b_line) = (0, 0);
        for edit in edits {
            positions.push((a_line, b_line));
            a_line += usize::from(edit.in_old());
            b_line += usize::from(edit.in_new());
        }

        let changes = edits
            .iter()
            .enumerate()
            .filter(|(_, edit)| edit.is_change())
            .map(|(offset, _)| offset)
            .collect::<Vec<_>>();

        let mut groups: Vec<(usize, usize)> = Vec::new();
        for offset in changes {
            match groups.last_mut() {
                Some((_, last)) if offset - *last - 1 <= 2 * context => *last = offset,
                _ => groups.push((offset, offset)),
            }
        }

        groups
            .into_iter()
            .map(|(first, last)| {
                let start = first.saturating_sub(context);
                let end = (last + context + 1).min(edits.len());
                let (a_start, b_start) = positions[start];

                Hunk {
                    a_start,
                    b_start,
                    edits: edits[start..end].to_vec(),
                }
            })
            .collect()
    }
}

impl<T> Hunk<T> {
    pub fn a_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.in_old()).count()
    }

    pub fn b_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.in_new()).count()
    }

    /// `@@ -a,b +c,d @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.a_start, self.a_size()),
            format_range(self.b_start, self.b_size())
        )
    }
}

/// One-based range; a single line drops its length and an empty range
/// names the line before it
fn format_range(start: usize, length: usize) -> String {
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, MyersDiff};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn numbered(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
        range.map(|n| format!("line{n}")).collect()
    }

    fn hunks(a: &[String], b: &[String]) -> Vec<Hunk<String>> {
        Hunk::filter(&MyersDiff::new(a, b).diff(), HUNK_CONTEXT)
    }

    #[test]
    fn identical_inputs_have_no_hunks() {
        let lines = numbered(1..=5);

        assert!(hunks(&lines, &lines).is_empty());
    }

    #[test]
    fn keeps_three_lines_of_context() {
        let a = numbered(1..=10);
        let mut b = a.clone();
        b[4] = "changed".to_string();

        let hunks = hunks(&a, &b);

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -2,7 +2,7 @@");
        assert_eq!(hunks[0].edits.first().map(|e| e.value().as_str()), Some("line2"));
        assert_eq!(hunks[0].edits.last().map(|e| e.value().as_str()), Some("line8"));
    }

    #[test]
    fn distant_changes_get_separate_hunks() {
        let a = numbered(1..=20);
        let mut b = a.clone();
        b[1] = "first".to_string();
        b[17] = "second".to_string();

        let headers = hunks(&a, &b).iter().map(Hunk::header).collect::<Vec<_>>();

        assert_eq!(headers, vec!["@@ -1,5 +1,5 @@", "@@ -15,6 +15,6 @@"]);
    }

    #[test]
    fn changes_six_lines_apart_share_a_hunk() {
        let a = numbered(1..=12);
        let mut b = a.clone();
        b[2] = "x".to_string();
        b[9] = "y".to_string();

        let headers = hunks(&a, &b).iter().map(Hunk::header).collect::<Vec<_>>();

        assert_eq!(headers, vec!["@@ -1,12 +1,12 @@"]);
    }

    #[rstest]
    #[case::from_nothing(vec![], vec!["only".to_string()], "@@ -0,0 +1 @@")]
    #[case::to_nothing(vec!["only".to_string()], vec![], "@@ -1 +0,0 @@")]
    #[case::append(numbered(1..=2), numbered(1..=3), "@@ -1,2 +1,3 @@")]
    fn formats_ranges_like_difflib(
        #[case] a: Vec<String>,
        #[case] b: Vec<String>,
        #[case] header: &str,
    ) {
        assert_eq!(hunks(&a, &b)[0].header(), header);
    }
}
