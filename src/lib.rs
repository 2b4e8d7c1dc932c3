//! # Rauzy
//!
//! Combinatorics of generalized interval permutations: abelian permutations,
//! which code interval exchange transformations, and quadratic permutations,
//! which code linear involutions, both optionally with flips.
//!
//! - [`involution`]: the pairing of slots and the Rauzy move acting on it.
//! - [`flip`]: per-slot signs and the move of flipped permutations.
//! - [`reducibility`]: corner searches deciding reducibility.
//! - [`permutation`]: labeled permutations, the public entry point.
//! - [`diagram`]: breadth first construction of Rauzy diagrams.
//! - [`cocycle`]: products of edge values along walks in a diagram.

pub mod cocycle;
pub mod diagram;
pub mod flip;
pub mod involution;
pub mod permutation;
pub mod reducibility;
pub mod typed_vec;
