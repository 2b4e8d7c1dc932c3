//! # Involutions on interval slots
//!
//! A generalized permutation is drawn as two rows of slots. Every slot carries
//! one occurrence of a label and is paired with exactly one other slot, its
//! *twin*. This module holds that pairing, independent of the labels.
//!
//! Two encodings exist:
//!
//! - [`AbelianTwins`]: every pair joins the top row to the bottom row, stored as
//!   a position map and its inverse.
//! - [`QuadraticTwins`]: pairs may lie inside one row, stored as one
//!   [`Slot`] per slot.
//!
//! Both implement [`Twins`], which also carries the Rauzy move on the pairing.

use std::{
    fmt::{Display, Formatter},
    hash::Hash,
    ops::Neg,
};

use ahash::AHashMap;
use bitvec::vec::BitVec;
use thiserror::Error;

use crate::reducibility::Corners;

mod abelian;
mod quadratic;

pub use abelian::AbelianTwins;
pub use quadratic::QuadraticTwins;

/// One of the two rows of a generalized permutation.
///
/// In a Rauzy move the row whose last interval wins is the *winner*, `-winner`
/// is the *loser*.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    pub const BOTH: [Row; 2] = [Row::Top, Row::Bottom];
}

impl Neg for Row {
    type Output = Row;

    fn neg(self) -> Self::Output {
        match self {
            Row::Top => Row::Bottom,
            Row::Bottom => Row::Top,
        }
    }
}

impl From<bool> for Row {
    fn from(value: bool) -> Self {
        if value {
            Row::Bottom
        } else {
            Row::Top
        }
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as usize)
    }
}

/// A position in one of the rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Slot {
    pub row: Row,
    pub pos: usize,
}

impl Slot {
    pub fn new(row: Row, pos: usize) -> Self {
        Slot { row, pos }
    }

    pub fn top(pos: usize) -> Self {
        Slot::new(Row::Top, pos)
    }

    pub fn bottom(pos: usize) -> Self {
        Slot::new(Row::Bottom, pos)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum Kind {
    /// Every pair crosses the rows (interval exchanges).
    Abelian,
    /// Pairs may sit inside a row (linear involutions).
    Quadratic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvolutionError {
    #[error("rows of an abelian permutation must have equal length, got {top} and {bottom}")]
    AsymmetricLength { top: usize, bottom: usize },
    #[error("label at {slot} occurs {occurrences} times, expected exactly twice")]
    UnmatchedLabel { slot: Slot, occurrences: usize },
    #[error("no length vector can satisfy the pairing: only one row has pairs inside itself")]
    InadmissibleLength,
    #[error("slot {slot} is paired with {twin}, which does not point back")]
    NotAnInvolution { slot: Slot, twin: Slot },
    #[error("slot {0} is paired with itself")]
    FixedPoint(Slot),
    #[error("slot {slot} is paired with {twin} in its own row, which an abelian permutation forbids")]
    SameRowPair { slot: Slot, twin: Slot },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no Rauzy move of type {winner} from this permutation")]
    NotMovable { winner: Row },
}

/// The pairing of slots together with the Rauzy move acting on it.
pub trait Twins {
    fn twin(&self, slot: Slot) -> Slot;

    fn len(&self, row: Row) -> usize;

    /// Whether the Rauzy move with the given winner exists.
    fn is_rauzy_movable(&self, winner: Row) -> bool;

    /// Where the loser's ending slot lands. `winner_flipped` tells whether the
    /// winner's ending interval is flipped, which moves the insertion point
    /// to the other side of the winner's twin.
    fn loser_to(&self, winner: Row, winner_flipped: bool) -> Option<Slot>;

    /// Moves the loser's ending slot to `to`, updating every twin pointer.
    ///
    /// Movability is not checked here.
    fn move_loser(&mut self, winner: Row, to: Slot);

    /// A splitting of the rows into two corners sharing no pair, if any.
    fn reducible_corners(&self) -> Option<Corners>;

    fn last(&self, row: Row) -> Option<Slot> {
        self.len(row).checked_sub(1).map(|pos| Slot::new(row, pos))
    }

    fn lengths(&self) -> [usize; 2] {
        [self.len(Row::Top), self.len(Row::Bottom)]
    }

    /// Number of pairs.
    fn total_len(&self) -> usize {
        (self.len(Row::Top) + self.len(Row::Bottom)) / 2
    }

    /// Numbers the pairs `0, 1, ..` in order of first appearance, reading the
    /// top row then the bottom row, and returns each slot's pair number.
    fn pair_ids(&self) -> [Vec<usize>; 2] {
        let [l0, l1] = self.lengths();
        let mut ids = [vec![0; l0], vec![0; l1]];
        let mut seen: [BitVec; 2] = [BitVec::repeat(false, l0), BitVec::repeat(false, l1)];
        let mut next = 0;
        for row in Row::BOTH {
            for pos in 0..self.len(row) {
                if seen[row as usize][pos] {
                    continue;
                }
                let twin = self.twin(Slot::new(row, pos));
                for s in [Slot::new(row, pos), twin] {
                    ids[s.row as usize][s.pos] = next;
                    seen[s.row as usize].set(s.pos, true);
                }
                next += 1;
            }
        }
        ids
    }
}

/// The pairing of a generalized permutation, in whichever encoding fits it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum Involution {
    Abelian(AbelianTwins),
    Quadratic(QuadraticTwins),
}

impl Involution {
    pub fn abelian<L: Eq + Hash>(rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        AbelianTwins::from_rows(rows).map(Involution::Abelian)
    }

    pub fn quadratic<L: Eq + Hash>(rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        QuadraticTwins::from_rows(rows).map(Involution::Quadratic)
    }

    /// Reads the pairing off labeled rows. The quadratic encoding is used as
    /// soon as some label repeats inside a row.
    pub fn from_rows<L: Eq + Hash>(rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        let occurrences = label_slots(rows);
        check_pairs(rows, &occurrences)?;
        if occurrences.values().any(|slots| slots[0].row == slots[1].row) {
            Self::quadratic(rows)
        } else {
            Self::abelian(rows)
        }
    }

    pub fn with_kind<L: Eq + Hash>(kind: Kind, rows: [&[L]; 2]) -> Result<Self, InvolutionError> {
        match kind {
            Kind::Abelian => Self::abelian(rows),
            Kind::Quadratic => Self::quadratic(rows),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Involution::Abelian(_) => Kind::Abelian,
            Involution::Quadratic(_) => Kind::Quadratic,
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        Row::BOTH
            .into_iter()
            .flat_map(move |row| (0..self.len(row)).map(move |pos| Slot::new(row, pos)))
    }

    /// Checks that the pairing is a fixed-point-free involution, and that an
    /// abelian one never pairs a row with itself.
    pub fn validate(&self) -> Result<(), InvolutionError> {
        for slot in self.slots() {
            let twin = self.twin(slot);
            if twin == slot {
                return Err(InvolutionError::FixedPoint(slot));
            }
            if twin.pos >= self.len(twin.row) || self.twin(twin) != slot {
                return Err(InvolutionError::NotAnInvolution { slot, twin });
            }
            if self.kind() == Kind::Abelian && twin.row == slot.row {
                return Err(InvolutionError::SameRowPair { slot, twin });
            }
        }
        Ok(())
    }

    /// Performs the Rauzy move with the given winner on the pairing alone and
    /// returns where the loser's ending slot went.
    pub fn rauzy_move(&mut self, winner: Row) -> Result<Slot, MoveError> {
        if !self.is_rauzy_movable(winner) {
            return Err(MoveError::NotMovable { winner });
        }
        let to = self
            .loser_to(winner, false)
            .ok_or(MoveError::NotMovable { winner })?;
        self.move_loser(winner, to);
        Ok(to)
    }
}

impl Twins for Involution {
    fn twin(&self, slot: Slot) -> Slot {
        match self {
            Involution::Abelian(a) => a.twin(slot),
            Involution::Quadratic(q) => q.twin(slot),
        }
    }

    fn len(&self, row: Row) -> usize {
        match self {
            Involution::Abelian(a) => a.len(row),
            Involution::Quadratic(q) => q.len(row),
        }
    }

    fn is_rauzy_movable(&self, winner: Row) -> bool {
        match self {
            Involution::Abelian(a) => a.is_rauzy_movable(winner),
            Involution::Quadratic(q) => q.is_rauzy_movable(winner),
        }
    }

    fn loser_to(&self, winner: Row, winner_flipped: bool) -> Option<Slot> {
        match self {
            Involution::Abelian(a) => a.loser_to(winner, winner_flipped),
            Involution::Quadratic(q) => q.loser_to(winner, winner_flipped),
        }
    }

    fn move_loser(&mut self, winner: Row, to: Slot) {
        match self {
            Involution::Abelian(a) => a.move_loser(winner, to),
            Involution::Quadratic(q) => q.move_loser(winner, to),
        }
    }

    fn reducible_corners(&self) -> Option<Corners> {
        match self {
            Involution::Abelian(a) => a.reducible_corners(),
            Involution::Quadratic(q) => q.reducible_corners(),
        }
    }
}

/// Slots of every label, in reading order (top row first).
fn label_slots<L: Eq + Hash>(rows: [&[L]; 2]) -> AHashMap<&L, Vec<Slot>> {
    let mut occurrences: AHashMap<&L, Vec<Slot>> = AHashMap::new();
    for row in Row::BOTH {
        for (pos, label) in rows[row as usize].iter().enumerate() {
            occurrences
                .entry(label)
                .or_default()
                .push(Slot::new(row, pos));
        }
    }
    occurrences
}

/// Fails on the first slot, in reading order, whose label does not occur
/// exactly twice.
fn check_pairs<L: Eq + Hash>(
    rows: [&[L]; 2],
    occurrences: &AHashMap<&L, Vec<Slot>>,
) -> Result<(), InvolutionError> {
    for row in Row::BOTH {
        for (pos, label) in rows[row as usize].iter().enumerate() {
            let count = occurrences.get(label).map_or(0, Vec::len);
            if count != 2 {
                return Err(InvolutionError::UnmatchedLabel {
                    slot: Slot::new(row, pos),
                    occurrences: count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test;
