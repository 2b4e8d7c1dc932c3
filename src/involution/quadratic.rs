use std::hash::Hash;

use crate::reducibility::{self, Corners};

use super::{check_pairs, label_slots, InvolutionError, Row, Slot, Twins};

/// Pairing of a quadratic permutation, one twin slot per slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct QuadraticTwins {
    rows: [Vec<Slot>; 2],
}

impl QuadraticTwins {
    /// Pairs the two occurrences of every label.
    ///
    /// A pairing where only one row has pairs inside itself admits no positive
    /// lengths and is rejected.
    pub fn from_rows<L: Eq + Hash>(rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        let occurrences = label_slots(rows);
        check_pairs(rows, &occurrences)?;

        let mut twins = [
            vec![Slot::top(0); rows[0].len()],
            vec![Slot::top(0); rows[1].len()],
        ];
        let mut inner = [false; 2];
        for slots in occurrences.values() {
            let [a, b] = [slots[0], slots[1]];
            twins[a.row as usize][a.pos] = b;
            twins[b.row as usize][b.pos] = a;
            if a.row == b.row {
                inner[a.row as usize] = true;
            }
        }
        if inner[0] != inner[1] {
            return Err(InvolutionError::InadmissibleLength);
        }
        Ok(QuadraticTwins { rows: twins })
    }

    pub fn row(&self, row: Row) -> &[Slot] {
        &self.rows[row as usize]
    }

    /// Number of slots of `row` whose twin lies in `row` as well.
    fn inner_slots(&self, row: Row) -> usize {
        self.row(row).iter().filter(|t| t.row == row).count()
    }

    fn set(&mut self, slot: Slot, twin: Slot) {
        self.rows[slot.row as usize][slot.pos] = twin;
    }
}

impl Twins for QuadraticTwins {
    fn twin(&self, slot: Slot) -> Slot {
        self.rows[slot.row as usize][slot.pos]
    }

    fn len(&self, row: Row) -> usize {
        self.rows[row as usize].len()
    }

    fn is_rauzy_movable(&self, winner: Row) -> bool {
        let loser = -winner;
        let (Some(end), Some(loser_end)) = (self.last(winner), self.last(loser)) else {
            return false;
        };
        let (twin, loser_twin) = (self.twin(end), self.twin(loser_end));
        if twin == loser_end {
            return false;
        }
        if twin.row == loser || loser_twin.row == winner {
            return true;
        }
        // both ends are paired inside their rows: the loser row must keep a
        // pair of its own once its ending one is gone
        self.inner_slots(loser) != 2
    }

    fn loser_to(&self, winner: Row, winner_flipped: bool) -> Option<Slot> {
        let twin = self.twin(self.last(winner)?);
        let shift = if twin.row == winner {
            winner_flipped
        } else {
            !winner_flipped
        };
        Some(Slot::new(twin.row, twin.pos + usize::from(shift)))
    }

    fn move_loser(&mut self, winner: Row, to: Slot) {
        let loser = -winner;
        let Some(loser_end) = self.last(loser) else {
            return;
        };
        let partner = self.twin(loser_end);

        let shifted: Vec<(usize, Slot)> = self.row(to.row)[to.pos..]
            .iter()
            .enumerate()
            .map(|(k, &twin)| (to.pos + k, twin))
            .collect();
        for (pos, twin) in shifted {
            self.set(twin, Slot::new(to.row, pos + 1));
        }
        self.set(partner, to);

        if let Some(moved) = self.rows[loser as usize].pop() {
            self.rows[to.row as usize].insert(to.pos, moved);
        }
    }

    fn reducible_corners(&self) -> Option<Corners> {
        let [top, bottom] = self.pair_ids();
        reducibility::quadratic_corners(&top, &bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twins(top: &str, bottom: &str) -> QuadraticTwins {
        let top: Vec<char> = top.chars().collect();
        let bottom: Vec<char> = bottom.chars().collect();
        QuadraticTwins::from_rows([&top[..], &bottom[..]]).unwrap()
    }

    #[test]
    fn pairs_inside_and_across_rows() {
        let t = twins("abb", "cca");
        assert_eq!(t.row(Row::Top), &[Slot::bottom(2), Slot::top(2), Slot::top(1)]);
        assert_eq!(
            t.row(Row::Bottom),
            &[Slot::bottom(1), Slot::bottom(0), Slot::top(0)]
        );
    }

    #[test]
    fn one_sided_inner_pairs_are_inadmissible() {
        let top: Vec<char> = "aab".chars().collect();
        assert_eq!(
            QuadraticTwins::from_rows([&top[..], &['b'][..]]),
            Err(InvolutionError::InadmissibleLength)
        );
    }

    #[test]
    fn insertion_into_the_winner_row() {
        let mut t = twins("aa", "bbcc");
        let to = t.loser_to(Row::Top, false).unwrap();
        assert_eq!(to, Slot::top(0));
        t.move_loser(Row::Top, to);
        assert_eq!(t, twins("caa", "bbc"));
    }

    #[test]
    fn insertion_into_the_loser_row() {
        let mut t = twins("112", "33424");
        let to = t.loser_to(Row::Top, false).unwrap();
        assert_eq!(to, Slot::bottom(4));
        t.move_loser(Row::Top, to);
        assert_eq!(t, twins("112", "33424"));

        let to = t.loser_to(Row::Bottom, false).unwrap();
        assert_eq!(to, Slot::bottom(2));
        t.move_loser(Row::Bottom, to);
        assert_eq!(t, twins("11", "332424"));
    }

    #[test]
    fn last_inner_pair_of_the_loser_row_cannot_move() {
        let t = twins("aabb", "cc");
        assert!(!t.is_rauzy_movable(Row::Top));
        assert!(t.is_rauzy_movable(Row::Bottom));

        let t = twins("aa", "bbcc");
        assert!(t.is_rauzy_movable(Row::Top));
        assert!(!t.is_rauzy_movable(Row::Bottom));
    }

    #[test]
    fn twinned_ends_cannot_move() {
        let t = twins("aab", "ccb");
        assert!(!t.is_rauzy_movable(Row::Top));
        assert!(!t.is_rauzy_movable(Row::Bottom));
    }
}
