//! # Flips
//!
//! A flipped interval is glued with its twin after reversing its orientation.
//! [`Flips`] stores one [`Sign`] per slot and wraps the Rauzy move of an
//! [`Involution`]: the insertion point of the loser moves to the other side of
//! the winner's twin when the winner is flipped, and the moved pair takes the
//! product of the two ending signs.

use std::{
    fmt::{Display, Formatter},
    hash::Hash,
    ops::{Mul, Neg},
};

use ahash::AHashSet;
use thiserror::Error;

use crate::involution::{Involution, MoveError, Row, Slot, Twins};

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Invalid value for Sign")]
    InvalidValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn is_minus(self) -> bool {
        self == Sign::Minus
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Self) -> Self::Output {
        if self == rhs {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

impl From<bool> for Sign {
    /// `true` for a flipped interval.
    fn from(flipped: bool) -> Self {
        if flipped {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }
}

impl TryFrom<i8> for Sign {
    type Error = SignError;
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Sign::Plus),
            -1 => Ok(Sign::Minus),
            _ => Err(SignError::InvalidValue),
        }
    }
}

impl From<Sign> for i8 {
    fn from(value: Sign) -> Self {
        match value {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Direct,
    Flipped,
}

/// Per-slot signs of a permutation with flips.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Flips {
    rows: [Vec<Sign>; 2],
}

impl Flips {
    /// Marks every occurrence of a label in `flipped` with [`Sign::Minus`].
    pub fn from_rows<L: Eq + Hash>(rows: [&[L]; 2], flipped: &[L]) -> Self {
        let flipped: AHashSet<&L> = flipped.iter().collect();
        Flips {
            rows: rows.map(|row| row.iter().map(|l| Sign::from(flipped.contains(l))).collect()),
        }
    }

    pub fn sign(&self, slot: Slot) -> Sign {
        self.rows[slot.row as usize][slot.pos]
    }

    pub fn is_flipped(&self, slot: Slot) -> bool {
        self.sign(slot).is_minus()
    }

    pub fn row(&self, row: Row) -> &[Sign] {
        &self.rows[row as usize]
    }

    pub fn last(&self, row: Row) -> Option<Sign> {
        self.rows[row as usize].last().copied()
    }

    /// Rauzy move of a flipped permutation, acting on both the signs and the
    /// pairing. Returns the slot the loser's ending slot moved to.
    pub fn rauzy_move(&mut self, involution: &mut Involution, winner: Row) -> Result<Slot, MoveError> {
        let loser = -winner;
        if !involution.is_rauzy_movable(winner) {
            return Err(MoveError::NotMovable { winner });
        }
        let (Some(winner_sign), Some(loser_sign), Some(loser_end)) =
            (self.last(winner), self.last(loser), involution.last(loser))
        else {
            return Err(MoveError::NotMovable { winner });
        };
        let to = involution
            .loser_to(winner, winner_sign.is_minus())
            .ok_or(MoveError::NotMovable { winner })?;

        let sign = winner_sign * loser_sign;
        let partner = involution.twin(loser_end);
        self.rows[partner.row as usize][partner.pos] = sign;
        self.rows[loser as usize].pop();
        self.rows[to.row as usize].insert(to.pos, sign);

        involution.move_loser(winner, to);
        Ok(to)
    }
}

impl Display for Flips {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for sign in row {
                write!(f, "{sign}")?;
            }
        }
        Ok(())
    }
}
