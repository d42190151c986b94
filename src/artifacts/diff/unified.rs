use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, MyersDiff};
use crate::artifacts::diff::hunk::{HUNK_CONTEXT, Hunk};
use derive_new::new;

/// Split content into lines without their terminators
///
/// Invalid UTF-8 is replaced rather than rejected, diffs are for display.
pub fn split_lines(content: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(content)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Unified diff of two line sequences
#[derive(Debug, new)]
pub struct UnifiedDiff<'d> {
    old_label: &'d str,
    new_label: &'d str,
    old: &'d [String],
    new: &'d [String],
}

impl<'d> UnifiedDiff<'d> {
    /// Output lines, without terminators; empty when both sides match
    pub fn render(&self) -> Vec<String> {
        let edits = MyersDiff::new(self.old, self.new).diff();
        let hunks = Hunk::filter(&edits, HUNK_CONTEXT);

        if hunks.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![
            format!("--- {}", self.old_label),
            format!("+++ {}", self.new_label),
        ];
        for hunk in hunks {
            lines.push(hunk.header());
            lines.extend(hunk.edits.iter().map(ToString::to_string));
        }

        lines
    }
}
