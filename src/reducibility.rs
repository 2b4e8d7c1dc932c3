//! # Reducibility
//!
//! A generalized permutation is reducible when both rows split into a left
//! and a right part such that no pair joins a left part to a right part, up
//! to the corners allowed for quadratic permutations. Moves never connect the
//! two sides again, so reducible permutations split the Rauzy diagram.
//!
//! The searches here work on pair numbers (see
//! [`Twins::pair_ids`](crate::involution::Twins::pair_ids)): two slots carry
//! the same number exactly when they are twins.

use std::ops::Range;

/// Position ranges of the four corners of a reducible permutation.
///
/// `top_left` and `bottom_left` are prefixes, `top_right` and `bottom_right`
/// suffixes of their row. Positions between a left and a right corner belong
/// to neither.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Corners {
    pub top_left: Range<usize>,
    pub top_right: Range<usize>,
    pub bottom_left: Range<usize>,
    pub bottom_right: Range<usize>,
}

impl Corners {
    /// Both rows cut at the same position `at`, nothing left in between.
    pub fn split(at: usize, lengths: [usize; 2]) -> Self {
        Corners {
            top_left: 0..at,
            top_right: at..lengths[0],
            bottom_left: 0..at,
            bottom_right: at..lengths[1],
        }
    }

    /// The four corners as label blocks, in the order top left, top right,
    /// bottom left, bottom right.
    pub fn blocks<'a, L>(&self, rows: [&'a [L]; 2]) -> [&'a [L]; 4] {
        [
            &rows[0][self.top_left.clone()],
            &rows[0][self.top_right.clone()],
            &rows[1][self.bottom_left.clone()],
            &rows[1][self.bottom_right.clone()],
        ]
    }
}

/// Prefix lengths `0, 1, ..` below `end` whose prefix has no repeated entry.
fn simple_prefixes(row: &[usize], end: usize) -> impl Iterator<Item = usize> + '_ {
    (0..end).take_while(move |&i| i == 0 || !row[..i - 1].contains(&row[i - 1]))
}

/// Suffix starts from the last position down to `start` whose suffix has no
/// repeated entry.
fn simple_suffixes(row: &[usize], start: usize) -> impl Iterator<Item = usize> + '_ {
    (start..row.len())
        .rev()
        .take_while(move |&i| !row[i + 1..].contains(&row[i]))
}

fn same_multiset(lhs: [&[usize]; 2], rhs: [&[usize]; 2]) -> bool {
    if lhs[0].len() + lhs[1].len() != rhs[0].len() + rhs[1].len() {
        return false;
    }
    let mut lhs = lhs.concat();
    let mut rhs = rhs.concat();
    lhs.sort_unstable();
    rhs.sort_unstable();
    lhs == rhs
}

/// Four corner search over the pair numbers of a quadratic permutation.
///
/// The corners `A11 = top[..i1]`, `A12 = top[i2..]`, `A21 = bottom[..i3]` and
/// `A22 = bottom[i4..]` must each be free of repeats and satisfy
/// `A11 + A22 == A12 + A21` as multisets. The first pass keeps both right
/// corners non-empty, the second one looks for empty right corners with
/// non-empty left ones.
pub(crate) fn quadratic_corners(top: &[usize], bottom: &[usize]) -> Option<Corners> {
    let (l0, l1) = (top.len(), bottom.len());

    for i1 in simple_prefixes(top, l0) {
        for i2 in simple_suffixes(top, i1) {
            for i3 in simple_prefixes(bottom, l1) {
                for i4 in simple_suffixes(bottom, i3) {
                    if same_multiset([&top[..i1], &bottom[i4..]], [&top[i2..], &bottom[..i3]]) {
                        return Some(Corners {
                            top_left: 0..i1,
                            top_right: i2..l0,
                            bottom_left: 0..i3,
                            bottom_right: i4..l1,
                        });
                    }
                }
            }
        }
    }

    for i1 in simple_prefixes(top, l0).skip(1) {
        for i3 in simple_prefixes(bottom, l1).skip(1) {
            if same_multiset([&top[..i1], &[]], [&bottom[..i3], &[]]) {
                return Some(Corners {
                    top_left: 0..i1,
                    top_right: l0..l0,
                    bottom_left: 0..i3,
                    bottom_right: l1..l1,
                });
            }
        }
    }

    None
}
