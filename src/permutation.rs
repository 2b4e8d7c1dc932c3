//! # Generalized permutations
//!
//! A [`Permutation`] is a pair of labeled rows where every label occurs
//! exactly twice, together with the pairing of its slots ([`Involution`]) and,
//! optionally, flips ([`Flips`]).
//!
//! ## Key Features:
//!
//! - **Construction**: [`Permutation::new`] picks the abelian encoding unless a
//!   label repeats inside a row, [`Permutation::with_flips`] adds flips,
//!   [`Permutation::with_kind`] forces an encoding.
//! - **Rauzy move**: [`Permutation::is_rauzy_movable`] and
//!   [`Permutation::rauzy_move`], in place, for every kind and orientation.
//! - **Reducibility**: [`Permutation::is_reducible`] and
//!   [`Permutation::reducible_decomposition`].
//! - **Labels**: the alphabet is fixed at construction, in order of first
//!   appearance. [`Permutation::standardized`] renames the letters in reading
//!   order, which makes two permutations with the same pairing and flips equal.
//!
//! Equality (`==`) compares labeled rows and flips. [`Permutation::reduced_eq`]
//! compares pairings and flips only.
//!
//! # Examples
//!
//! ```
//! use rauzy::{involution::Row, permutation::Permutation};
//!
//! let mut p = Permutation::new(vec!['a', 'b', 'c'], vec!['c', 'b', 'a']).unwrap();
//! p.rauzy_move(Row::Top).unwrap();
//! assert_eq!(p.rows(), [&['a', 'b', 'c'][..], &['c', 'a', 'b'][..]]);
//! ```

use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use indexmap::IndexSet;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    cocycle::Substitution,
    flip::{Flips, Orientation},
    involution::{Involution, InvolutionError, Kind, MoveError, Row, Slot, Twins},
    reducibility::Corners,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error(transparent)]
    Involution(#[from] InvolutionError),
    #[error("flipped label number {position} does not occur in the rows")]
    UnknownFlippedLabel { position: usize },
    #[error("relabeling sends two letters to the same one")]
    RelabelCollision,
}

/// The four corners of a reducible permutation, as labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decomposition<L> {
    pub top_left: Vec<L>,
    pub top_right: Vec<L>,
    pub bottom_left: Vec<L>,
    pub bottom_right: Vec<L>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "L: serde::Serialize",
        deserialize = "L: serde::Deserialize<'de> + Eq + Hash"
    ))
)]
pub struct Permutation<L> {
    involution: Involution,
    flips: Option<Flips>,
    labels: [Vec<L>; 2],
    alphabet: IndexSet<L>,
}

impl<L: Clone + Eq + Hash> Permutation<L> {
    pub fn new(top: Vec<L>, bottom: Vec<L>) -> Result<Self, PermutationError> {
        let involution = Involution::from_rows([&top[..], &bottom[..]])?;
        Ok(Self::assemble(involution, None, [top, bottom]))
    }

    /// A permutation where the intervals labeled by `flipped` are flipped.
    ///
    /// An empty `flipped` gives a permutation without flips.
    pub fn with_flips(top: Vec<L>, bottom: Vec<L>, flipped: &[L]) -> Result<Self, PermutationError> {
        let involution = Involution::from_rows([&top[..], &bottom[..]])?;
        Self::flipped(involution, [top, bottom], flipped)
    }

    /// Like [`Permutation::with_flips`], with the encoding chosen by the
    /// caller. A quadratic encoding of an abelian pairing is allowed.
    pub fn with_kind(
        kind: Kind,
        top: Vec<L>,
        bottom: Vec<L>,
        flipped: &[L],
    ) -> Result<Self, PermutationError> {
        let involution = Involution::with_kind(kind, [&top[..], &bottom[..]])?;
        Self::flipped(involution, [top, bottom], flipped)
    }

    fn flipped(involution: Involution, labels: [Vec<L>; 2], flipped: &[L]) -> Result<Self, PermutationError> {
        if flipped.is_empty() {
            return Ok(Self::assemble(involution, None, labels));
        }
        let flips = Flips::from_rows([&labels[0][..], &labels[1][..]], flipped);
        let permutation = Self::assemble(involution, Some(flips), labels);
        if let Some(position) = flipped
            .iter()
            .position(|l| !permutation.alphabet.contains(l))
        {
            return Err(PermutationError::UnknownFlippedLabel { position });
        }
        Ok(permutation)
    }

    fn assemble(involution: Involution, flips: Option<Flips>, labels: [Vec<L>; 2]) -> Self {
        let alphabet = labels.iter().flatten().cloned().collect();
        Permutation {
            involution,
            flips,
            labels,
            alphabet,
        }
    }

    /// Rows renamed by pair number over the alphabet: the first pair in
    /// reading order gets the first letter, and so on.
    pub fn reduced_rows(&self) -> [Vec<L>; 2] {
        let letters: Vec<&L> = self.alphabet.iter().collect();
        self.involution
            .pair_ids()
            .map(|row| row.into_iter().map(|id| letters[id].clone()).collect())
    }

    /// The representative of this permutation up to relabeling.
    pub fn standardized(&self) -> Self {
        Permutation {
            involution: self.involution.clone(),
            flips: self.flips.clone(),
            labels: self.reduced_rows(),
            alphabet: self.alphabet.clone(),
        }
    }

    /// Renames every letter through `f`, which must be injective on the
    /// alphabet.
    pub fn relabel<M, F>(&self, mut f: F) -> Result<Permutation<M>, PermutationError>
    where
        M: Clone + Eq + Hash,
        F: FnMut(&L) -> M,
    {
        let alphabet: IndexSet<M> = self.alphabet.iter().map(&mut f).collect();
        if alphabet.len() != self.alphabet.len() {
            return Err(PermutationError::RelabelCollision);
        }
        let labels = [
            self.labels[0].iter().map(&mut f).collect(),
            self.labels[1].iter().map(&mut f).collect(),
        ];
        Ok(Permutation {
            involution: self.involution.clone(),
            flips: self.flips.clone(),
            labels,
            alphabet,
        })
    }

    /// Performs the Rauzy move with the given winner in place.
    ///
    /// Nothing changes when the move does not exist.
    pub fn rauzy_move(&mut self, winner: Row) -> Result<(), MoveError> {
        let to = match &mut self.flips {
            Some(flips) => flips.rauzy_move(&mut self.involution, winner)?,
            None => self.involution.rauzy_move(winner)?,
        };
        if let Some(label) = self.labels[-winner as usize].pop() {
            self.labels[to.row as usize].insert(to.pos, label);
        }
        Ok(())
    }

    /// The substitution of the Rauzy move with the given winner, if it exists.
    pub fn rauzy_move_substitution(&self, winner: Row) -> Option<Substitution<L>> {
        if !self.is_rauzy_movable(winner) {
            return None;
        }
        Substitution::rauzy_move(self, winner)
    }

    pub fn reducible_decomposition(&self) -> Option<Decomposition<L>> {
        let corners = self.reducible_corners()?;
        let [top_left, top_right, bottom_left, bottom_right] =
            corners.blocks(self.rows()).map(<[L]>::to_vec);
        Some(Decomposition {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }

    /// Equality up to relabeling: same pairing, same flips. The encoding of
    /// the pairing does not matter.
    pub fn reduced_eq(&self, other: &Self) -> bool {
        self.involution.pair_ids() == other.involution.pair_ids() && self.flips == other.flips
    }
}

impl<L> Permutation<L> {
    pub fn rows(&self) -> [&[L]; 2] {
        [&self.labels[0], &self.labels[1]]
    }

    pub fn row(&self, row: Row) -> &[L] {
        &self.labels[row as usize]
    }

    pub fn label(&self, slot: Slot) -> &L {
        &self.labels[slot.row as usize][slot.pos]
    }

    pub fn alphabet(&self) -> &IndexSet<L> {
        &self.alphabet
    }

    pub fn involution(&self) -> &Involution {
        &self.involution
    }

    pub fn flips(&self) -> Option<&Flips> {
        self.flips.as_ref()
    }

    pub fn kind(&self) -> Kind {
        self.involution.kind()
    }

    pub fn is_abelian(&self) -> bool {
        self.kind() == Kind::Abelian
    }

    pub fn orientation(&self) -> Orientation {
        if self.flips.is_some() {
            Orientation::Flipped
        } else {
            Orientation::Direct
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flips.is_some()
    }

    pub fn twin(&self, slot: Slot) -> Slot {
        self.involution.twin(slot)
    }

    pub fn lengths(&self) -> [usize; 2] {
        self.involution.lengths()
    }

    /// Number of intervals, that is of distinct letters.
    pub fn len(&self) -> usize {
        self.involution.total_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_rauzy_movable(&self, winner: Row) -> bool {
        self.involution.is_rauzy_movable(winner)
    }

    /// Label of the last interval of the winner row.
    pub fn winner_letter(&self, winner: Row) -> Option<&L> {
        self.labels[winner as usize].last()
    }

    /// Label of the last interval of the loser row.
    pub fn loser_letter(&self, winner: Row) -> Option<&L> {
        self.labels[-winner as usize].last()
    }

    pub fn reducible_corners(&self) -> Option<Corners> {
        self.involution.reducible_corners()
    }

    pub fn is_reducible(&self) -> bool {
        self.reducible_corners().is_some()
    }
}

impl<L: PartialEq> PartialEq for Permutation<L> {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels && self.flips == other.flips
    }
}

impl<L: Eq> Eq for Permutation<L> {}

impl<L: Hash> Hash for Permutation<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.hash(state);
        self.flips.hash(state);
    }
}

impl<L: Display> Display for Permutation<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in Row::BOTH {
            if row == Row::Bottom {
                writeln!(f)?;
            }
            let line = self.labels[row as usize]
                .iter()
                .enumerate()
                .map(|(pos, label)| {
                    let flipped = self
                        .flips
                        .as_ref()
                        .is_some_and(|flips| flips.is_flipped(Slot::new(row, pos)));
                    if flipped {
                        format!("-{label}")
                    } else {
                        label.to_string()
                    }
                })
                .join(" ");
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
