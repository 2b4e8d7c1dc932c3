use std::hash::Hash;

use ahash::AHashMap;
use bitvec::vec::BitVec;

use crate::reducibility::Corners;

use super::{check_pairs, label_slots, InvolutionError, Row, Slot, Twins};

/// Pairing of an abelian permutation: `top[i]` is the bottom position paired
/// with top position `i`, and `bottom` is the inverse map.
///
/// # Examples
///
/// ```
/// use rauzy::involution::{AbelianTwins, Slot, Twins};
///
/// let twins = AbelianTwins::from_rows([&['a', 'b', 'c'][..], &['c', 'a', 'b'][..]]).unwrap();
/// assert_eq!(twins.map(), &[1, 2, 0]);
/// assert_eq!(twins.twin(Slot::bottom(0)), Slot::top(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct AbelianTwins {
    top: Vec<usize>,
    bottom: Vec<usize>,
}

impl AbelianTwins {
    pub fn from_rows<L: Eq + Hash>(rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        let [top, bottom] = rows;
        if top.len() != bottom.len() {
            return Err(InvolutionError::AsymmetricLength {
                top: top.len(),
                bottom: bottom.len(),
            });
        }

        let occurrences = label_slots(rows);
        check_pairs(rows, &occurrences)?;

        let positions: AHashMap<&L, usize> = bottom.iter().enumerate().map(|(j, l)| (l, j)).collect();
        let mut map = Vec::with_capacity(top.len());
        let mut hit: BitVec = BitVec::repeat(false, bottom.len());
        for (i, label) in top.iter().enumerate() {
            match positions.get(label) {
                Some(&j) if !hit[j] => {
                    hit.set(j, true);
                    map.push(j);
                }
                // both occurrences sit in the top row
                _ => {
                    let slot = Slot::top(i);
                    let twin = occurrences
                        .get(label)
                        .and_then(|slots| slots.iter().copied().find(|&s| s != slot))
                        .unwrap_or(slot);
                    return Err(InvolutionError::SameRowPair { slot, twin });
                }
            }
        }
        Ok(Self::from_map(map))
    }

    /// Builds the pairing from the top-to-bottom position map.
    pub fn from_map(top: Vec<usize>) -> Self {
        let mut bottom = vec![0; top.len()];
        for (i, &j) in top.iter().enumerate() {
            bottom[j] = i;
        }
        AbelianTwins { top, bottom }
    }

    /// Top-to-bottom position map.
    pub fn map(&self) -> &[usize] {
        &self.top
    }

    /// Bottom-to-top position map.
    pub fn inv(&self) -> &[usize] {
        &self.bottom
    }

    fn row(&self, row: Row) -> &[usize] {
        match row {
            Row::Top => &self.top,
            Row::Bottom => &self.bottom,
        }
    }
}

impl Twins for AbelianTwins {
    fn twin(&self, slot: Slot) -> Slot {
        Slot::new(-slot.row, self.row(slot.row)[slot.pos])
    }

    fn len(&self, _row: Row) -> usize {
        self.top.len()
    }

    fn is_rauzy_movable(&self, winner: Row) -> bool {
        match (self.last(winner), self.last(-winner)) {
            (Some(end), Some(loser_end)) => self.twin(end) != loser_end,
            _ => false,
        }
    }

    fn loser_to(&self, winner: Row, winner_flipped: bool) -> Option<Slot> {
        let twin = self.twin(self.last(winner)?);
        Some(Slot::new(twin.row, twin.pos + usize::from(!winner_flipped)))
    }

    fn move_loser(&mut self, winner: Row, to: Slot) {
        let (winner_map, loser_map) = match winner {
            Row::Top => (&mut self.top, &mut self.bottom),
            Row::Bottom => (&mut self.bottom, &mut self.top),
        };
        let Some(moved) = loser_map.pop() else {
            return;
        };
        loser_map.insert(to.pos, moved);
        winner_map[moved] = to.pos;
        for &shifted in &loser_map[to.pos + 1..] {
            winner_map[shifted] += 1;
        }
    }

    /// The first proper prefix of the top row whose twins fill a prefix of the
    /// bottom row.
    fn reducible_corners(&self) -> Option<Corners> {
        let n = self.top.len();
        let mut reach = 0;
        for (i, &j) in self.top.iter().enumerate().take(n.saturating_sub(1)) {
            reach = reach.max(j);
            if reach == i {
                return Some(Corners::split(i + 1, [n, n]));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twins(top: &str, bottom: &str) -> AbelianTwins {
        let top: Vec<char> = top.chars().collect();
        let bottom: Vec<char> = bottom.chars().collect();
        AbelianTwins::from_rows([&top[..], &bottom[..]]).unwrap()
    }

    #[test]
    fn maps_are_mutually_inverse() {
        let t = twins("abcd", "dbca");
        assert_eq!(t.map(), &[3, 1, 2, 0]);
        assert_eq!(t.inv(), &[3, 1, 2, 0]);

        let t = twins("abc", "bca");
        assert_eq!(t.map(), &[2, 0, 1]);
        assert_eq!(t.inv(), &[1, 2, 0]);
    }

    #[test]
    fn top_move_rotates_the_bottom_tail() {
        let mut t = twins("abc", "cba");
        t.move_loser(Row::Top, Slot::bottom(1));
        assert_eq!(t, twins("abc", "cab"));
    }

    #[test]
    fn bottom_move_rotates_the_top_tail() {
        let mut t = twins("abc", "cba");
        t.move_loser(Row::Bottom, Slot::top(1));
        assert_eq!(t, twins("acb", "cba"));
    }

    #[test]
    fn ends_paired_together_block_both_moves() {
        let t = twins("abc", "bac");
        assert!(!t.is_rauzy_movable(Row::Top));
        assert!(!t.is_rauzy_movable(Row::Bottom));
    }

    #[test]
    fn prefix_closure_finds_the_first_split() {
        assert_eq!(
            twins("abcd", "badc").reducible_corners(),
            Some(Corners::split(2, [4, 4]))
        );
        assert_eq!(twins("abcd", "dcba").reducible_corners(), None);
    }
}
