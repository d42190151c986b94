use derive_new::new;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value } | Edit::Insert { value } | Edit::Equal { value } => value,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Edit::Equal { .. })
    }

    /// Whether the edit consumes a line of the old side
    pub fn in_old(&self) -> bool {
        !matches!(self, Edit::Insert { .. })
    }

    /// Whether the edit consumes a line of the new side
    pub fn in_new(&self) -> bool {
        !matches!(self, Edit::Delete { .. })
    }

    pub fn marker(&self) -> char {
        match self {
            Edit::Delete { .. } => '-',
            Edit::Insert { .. } => '+',
            Edit::Equal { .. } => ' ',
        }
    }
}

impl<T: Display> Display for Edit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.marker(), self.value())
    }
}

pub trait DiffAlgorithm<'d, T> {
    type Trace;
    type EditPath;

    fn compute_shortest_edit(&self) -> Self::Trace;
    fn backtrack(&self) -> Self::EditPath;
    fn diff(&self) -> Vec<Edit<T>>;
}

/// Largest edit distance searched for a shortest script
///
/// The trace keeps one window of `2d + 3` diagonals per step, so memory grows
/// with the square of the distance. Beyond this bound the sides are diffed as
/// a plain replacement of everything between their common prefix and suffix.
pub const MAX_EDIT_DISTANCE: usize = 2048;

/// Myers' O(ND) shortest edit script between two sequences
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> DiffAlgorithm<'d, T> for MyersDiff<'d, T> {
    /// Furthest-reaching x for diagonals `-d-1..=d+1`, one window per edit
    /// distance; `None` past [`MAX_EDIT_DISTANCE`]
    type Trace = Option<Vec<Vec<isize>>>;
    /// `(prev_x, prev_y, x, y)` moves, from the end back to the origin
    type EditPath = Option<Vec<(isize, isize, isize, isize)>>;

    fn compute_shortest_edit(&self) -> Self::Trace {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (n + m) as usize;

        // one extra slot on each side so k = -d and k = d can look at their neighbour
        let mut v = vec![0; 2 * offset + 3];
        let offset = offset + 1;
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            if d as usize > MAX_EDIT_DISTANCE {
                return None;
            }

            let window = (offset as isize - d - 1) as usize..=(offset as isize + d + 1) as usize;
            trace.push(v[window].to_vec());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                    // down from k+1: insertion
                    v[idx + 1]
                } else {
                    // right from k-1: deletion
                    v[idx - 1] + 1
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return Some(trace);
                }
            }
        }

        Some(trace)
    }

    fn backtrack(&self) -> Self::EditPath {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let mut edit_path = Vec::new();

        for (d, v) in self.compute_shortest_edit()?.iter().enumerate().rev() {
            let d = d as isize;
            // the window for step d starts at diagonal -d-1
            let offset = d + 1;
            let k = x - y;

            let came_down = k == -d
                || (k != d && v[(offset + k - 1) as usize] < v[(offset + k + 1) as usize]);
            let prev_k = if came_down {
                k + 1
            } else {
                k - 1
            };

            let prev_x = v[(offset + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                edit_path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        Some(edit_path)
    }

    fn diff(&self) -> Vec<Edit<T>> {
        if self.a.is_empty() && self.b.is_empty() {
            return Vec::new();
        }

        let Some(edit_path) = self.backtrack() else {
            return self.replacement();
        };

        let mut edits = edit_path
            .into_iter()
            .map(|(prev_x, prev_y, x, y)| {
                if x == prev_x {
                    Edit::Insert {
                        value: self.b[prev_y as usize].clone(),
                    }
                } else if y == prev_y {
                    Edit::Delete {
                        value: self.a[prev_x as usize].clone(),
                    }
                } else {
                    Edit::Equal {
                        value: self.a[prev_x as usize].clone(),
                    }
                }
            })
            .collect::<Vec<_>>();

        edits.reverse();
        edits
    }
}

impl<T: Eq + Clone> MyersDiff<'_, T> {
    /// Keep the common prefix and suffix, delete the rest of `a`, insert the rest of `b`
    fn replacement(&self) -> Vec<Edit<T>> {
        let prefix = self
            .a
            .iter()
            .zip(self.b)
            .take_while(|(old, new)| old == new)
            .count();
        let suffix = self.a[prefix..]
            .iter()
            .rev()
            .zip(self.b[prefix..].iter().rev())
            .take_while(|(old, new)| old == new)
            .count();

        let equal = |value: &T| Edit::Equal {
            value: value.clone(),
        };

        self.a[..prefix]
            .iter()
            .map(equal)
            .chain(
                self.a[prefix..self.a.len() - suffix]
                    .iter()
                    .map(|value| Edit::Delete {
                        value: value.clone(),
                    }),
            )
            .chain(
                self.b[prefix..self.b.len() - suffix]
                    .iter()
                    .map(|value| Edit::Insert {
                        value: value.clone(),
                    }),
            )
            .chain(self.a[self.a.len() - suffix..].iter().map(equal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn letters() -> (Vec<char>, Vec<char>) {
        ("abcabba".chars().collect(), "cbabac".chars().collect())
    }

    #[fixture]
    fn lines() -> (Vec<&'static str>, Vec<&'static str>) {
        (
            vec!["line1", "line2", "line3", "line4"],
            vec!["line2", "line3_modified", "line4", "line5"],
        )
    }

    #[rstest]
    fn finds_the_shortest_script_for_letters(letters: (Vec<char>, Vec<char>)) {
        let (a, b) = letters;
        let expected = vec![
            Edit::Delete { value: 'a' },
            Edit::Delete { value: 'b' },
            Edit::Equal { value: 'c' },
            Edit::Insert { value: 'b' },
            Edit::Equal { value: 'a' },
            Edit::Equal { value: 'b' },
            Edit::Delete { value: 'b' },
            Edit::Equal { value: 'a' },
            Edit::Insert { value: 'c' },
        ];

        assert_eq!(MyersDiff::new(&a, &b).diff(), expected);
    }

    #[rstest]
    fn diffs_lines(lines: (Vec<&'static str>, Vec<&'static str>)) {
        let (a, b) = lines;
        let expected = vec![
            Edit::Delete { value: "line1" },
            Edit::Equal { value: "line2" },
            Edit::Delete { value: "line3" },
            Edit::Insert {
                value: "line3_modified",
            },
            Edit::Equal { value: "line4" },
            Edit::Insert { value: "line5" },
        ];

        assert_eq!(MyersDiff::new(&a, &b).diff(), expected);
    }

    #[rstest]
    #[case::both_empty(vec![], vec![], vec![])]
    #[case::old_empty(vec![], vec!["x"], vec![Edit::Insert { value: "x" }])]
    #[case::new_empty(vec!["x"], vec![], vec![Edit::Delete { value: "x" }])]
    fn handles_empty_sides(
        #[case] a: Vec<&'static str>,
        #[case] b: Vec<&'static str>,
        #[case] expected: Vec<Edit<&'static str>>,
    ) {
        assert_eq!(MyersDiff::new(&a, &b).diff(), expected);
    }

    #[test]
    fn displays_with_markers() {
        assert_eq!(Edit::Insert { value: "x" }.to_string(), "+x");
        assert_eq!(Edit::Delete { value: "x" }.to_string(), "-x");
        assert_eq!(Edit::Equal { value: "x" }.to_string(), " x");
    }

    proptest! {
        #[test]
        fn edits_rebuild_both_sides(
            a in prop::collection::vec(0u8..4, 0..24),
            b in prop::collection::vec(0u8..4, 0..24),
        ) {
            let edits = MyersDiff::new(&a, &b).diff();

            let old = edits.iter().filter(|e| e.in_old()).map(|e| *e.value()).collect::<Vec<_>>();
            let new = edits.iter().filter(|e| e.in_new()).map(|e| *e.value()).collect::<Vec<_>>();

            prop_assert_eq!(old, a);
            prop_assert_eq!(new, b);
        }
    }

    #[test]
    fn distant_sides_fall_back_to_a_replacement() {
        let a = std::iter::once(0)
            .chain(1..=MAX_EDIT_DISTANCE)
            .chain(std::iter::once(usize::MAX))
            .collect::<Vec<_>>();
        let b = std::iter::once(0)
            .chain(MAX_EDIT_DISTANCE + 1..=2 * MAX_EDIT_DISTANCE)
            .chain(std::iter::once(usize::MAX))
            .collect::<Vec<_>>();

        let edits = MyersDiff::new(&a, &b).diff();

        assert_eq!(edits.len(), 2 * MAX_EDIT_DISTANCE + 2);
        assert_eq!(edits[0], Edit::Equal { value: 0 });
        assert!(edits[1..=MAX_EDIT_DISTANCE]
            .iter()
            .all(|edit| matches!(edit, Edit::Delete { .. })));
        assert!(edits[MAX_EDIT_DISTANCE + 1..=2 * MAX_EDIT_DISTANCE]
            .iter()
            .all(|edit| matches!(edit, Edit::Insert { .. })));
        assert_eq!(edits.last(), Some(&Edit::Equal { value: usize::MAX }));
    }
}
