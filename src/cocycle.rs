//! # Path cocycles
//!
//! A cocycle gives every edge of a Rauzy diagram a value in a monoid. Its
//! value on a walk is the product of the edge values along the walk, starting
//! from the identity.
//!
//! - [`path_cocycle`] folds arbitrary edge values with an arbitrary product.
//! - [`Cocycle`] packages an edge value with its product. The standard ones are
//!   [`SubstitutionCocycle`], [`MatrixCocycle`], [`WinnerCocycle`] and
//!   [`LoserCocycle`].
//!
//! # Examples
//!
//! ```
//! use rauzy::{
//!     cocycle::Walk,
//!     diagram::{RauzyDiagram, VertexId},
//!     involution::Row,
//!     permutation::Permutation,
//! };
//!
//! let seed = Permutation::new(vec!['a', 'b', 'c'], vec!['c', 'b', 'a']).unwrap();
//! let diagram = RauzyDiagram::build(&seed);
//! let walk = Walk::new(VertexId(0)).then(Row::Top).then(Row::Bottom);
//! assert_eq!(diagram.path_to_winners(&walk).unwrap(), vec!['c', 'b']);
//! ```

use std::{hash::Hash, ops::Mul};

use indexmap::IndexMap;
use nalgebra::DMatrix;

use crate::{
    diagram::{Canonicalization, DiagramError, RauzyDiagram, VertexId},
    involution::Row,
    permutation::Permutation,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Follow the edge of the given type.
    Edge(Row),
    /// Follow the edge of the given type, that many times.
    Repeat(Row, usize),
}

impl From<Row> for Step {
    fn from(winner: Row) -> Self {
        Step::Edge(winner)
    }
}

/// A walk in a Rauzy diagram: a start vertex and the types of the edges to
/// follow.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Walk {
    pub start: VertexId,
    pub steps: Vec<Step>,
}

impl Walk {
    pub fn new(start: VertexId) -> Self {
        Walk {
            start,
            steps: Vec::new(),
        }
    }

    pub fn then(mut self, winner: Row) -> Self {
        self.steps.push(Step::Edge(winner));
        self
    }

    pub fn repeat(mut self, winner: Row, count: usize) -> Self {
        self.steps.push(Step::Repeat(winner, count));
        self
    }

    /// Edge types in order, repetitions unrolled.
    pub fn edges(&self) -> impl Iterator<Item = Row> + '_ {
        self.steps.iter().flat_map(|step| match *step {
            Step::Edge(winner) => std::iter::repeat(winner).take(1),
            Step::Repeat(winner, count) => std::iter::repeat(winner).take(count),
        })
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Edge(_) => 1,
                Step::Repeat(_, count) => *count,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An edge of a walk, handed to edge value functions.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a, L> {
    pub source: VertexId,
    pub permutation: &'a Permutation<L>,
    pub winner: Row,
}

/// Folds `edge_value` along `walk` with `combine`.
///
/// `edge_value(None)` is the identity the fold starts from. Fails on an
/// unknown start vertex and on the first step along a missing edge.
///
/// The edge values see the vertices as stored, so on a reduced diagram the
/// letters of consecutive edges are unrelated.
pub fn path_cocycle<L, M>(
    diagram: &RauzyDiagram<L>,
    walk: &Walk,
    mut edge_value: impl FnMut(Option<Edge<'_, L>>) -> M,
    mut combine: impl FnMut(M, M) -> M,
) -> Result<M, DiagramError> {
    let mut value = edge_value(None);
    let mut current = walk.start;
    if diagram.vertex(current).is_none() {
        return Err(DiagramError::UnknownVertex(current));
    }
    for winner in walk.edges() {
        let next = diagram.neighbour(current, winner)?;
        let permutation = diagram
            .vertex(current)
            .ok_or(DiagramError::UnknownVertex(current))?;
        let edge = edge_value(Some(Edge {
            source: current,
            permutation,
            winner,
        }));
        value = combine(value, edge);
        current = next;
    }
    Ok(value)
}

/// A monoid-valued function on the edges of Rauzy diagrams.
pub trait Cocycle<L> {
    type Value;

    fn identity(&self, diagram: &RauzyDiagram<L>) -> Self::Value;

    fn edge_value(&self, diagram: &RauzyDiagram<L>, edge: Edge<'_, L>) -> Self::Value;

    /// `acc` followed by `edge`.
    fn combine(&self, acc: Self::Value, edge: Self::Value) -> Self::Value;
}

impl<L> RauzyDiagram<L> {
    /// Value of `cocycle` along `walk`. Only labeled diagrams carry a common
    /// alphabet, reduced ones fail with [`DiagramError::Unlabeled`].
    pub fn path_value<C: Cocycle<L>>(&self, walk: &Walk, cocycle: &C) -> Result<C::Value, DiagramError> {
        if self.canonicalization() != Canonicalization::Labeled {
            return Err(DiagramError::Unlabeled);
        }
        path_cocycle(
            self,
            walk,
            |edge| match edge {
                None => cocycle.identity(self),
                Some(edge) => cocycle.edge_value(self, edge),
            },
            |acc, edge| cocycle.combine(acc, edge),
        )
    }
}

impl<L: Clone + Eq + Hash> RauzyDiagram<L> {
    pub fn path_to_substitution(&self, walk: &Walk) -> Result<Substitution<L>, DiagramError> {
        self.path_value(walk, &SubstitutionCocycle)
    }

    pub fn path_to_matrix(&self, walk: &Walk) -> Result<DMatrix<i64>, DiagramError> {
        self.path_value(walk, &MatrixCocycle)
    }

    pub fn path_to_winners(&self, walk: &Walk) -> Result<Vec<L>, DiagramError> {
        self.path_value(walk, &WinnerCocycle)
    }

    pub fn path_to_losers(&self, walk: &Walk) -> Result<Vec<L>, DiagramError> {
        self.path_value(walk, &LoserCocycle)
    }
}

/// A map from letters to words. Letters without an image are fixed.
#[derive(Clone, Debug)]
pub struct Substitution<L> {
    images: IndexMap<L, Vec<L>>,
}

impl<L: Clone + Eq + Hash> Substitution<L> {
    pub fn identity<'a>(alphabet: impl IntoIterator<Item = &'a L>) -> Self
    where
        L: 'a,
    {
        Substitution {
            images: alphabet.into_iter().map(|l| (l.clone(), vec![l.clone()])).collect(),
        }
    }

    pub fn from_images(images: impl IntoIterator<Item = (L, Vec<L>)>) -> Self {
        Substitution {
            images: images.into_iter().collect(),
        }
    }

    /// The substitution of a Rauzy move: identity except for the loser
    /// letter, sent to the bottom ending letter followed by the top ending
    /// letter.
    pub fn rauzy_move(permutation: &Permutation<L>, winner: Row) -> Option<Self> {
        let loser = permutation.loser_letter(winner)?.clone();
        let top_end = permutation.row(Row::Top).last()?.clone();
        let bottom_end = permutation.row(Row::Bottom).last()?.clone();
        let mut substitution = Self::identity(permutation.alphabet());
        substitution.images.insert(loser, vec![bottom_end, top_end]);
        Some(substitution)
    }

    pub fn image(&self, letter: &L) -> Option<&[L]> {
        self.images.get(letter).map(Vec::as_slice)
    }

    pub fn apply(&self, word: &[L]) -> Vec<L> {
        word.iter()
            .flat_map(|l| match self.images.get(l) {
                Some(image) => image.clone(),
                None => vec![l.clone()],
            })
            .collect()
    }

    /// `self ∘ other`: `other` first, then `self` on the result.
    pub fn compose(&self, other: &Self) -> Self {
        let mut images: IndexMap<L, Vec<L>> = other
            .images
            .iter()
            .map(|(l, image)| (l.clone(), self.apply(image)))
            .collect();
        for (l, image) in &self.images {
            if !images.contains_key(l) {
                images.insert(l.clone(), image.clone());
            }
        }
        Substitution { images }
    }
}

impl<L: Eq + Hash> PartialEq for Substitution<L> {
    fn eq(&self, other: &Self) -> bool {
        self.images == other.images
    }
}

impl<L: Eq + Hash> Eq for Substitution<L> {}

impl<L: Clone + Eq + Hash> Mul for &Substitution<L> {
    type Output = Substitution<L>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

/// Substitutions of the moves, composed as `acc ∘ edge`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstitutionCocycle;

impl<L: Clone + Eq + Hash> Cocycle<L> for SubstitutionCocycle {
    type Value = Substitution<L>;

    fn identity(&self, diagram: &RauzyDiagram<L>) -> Self::Value {
        Substitution::identity(diagram.alphabet().into_iter().flatten())
    }

    fn edge_value(&self, diagram: &RauzyDiagram<L>, edge: Edge<'_, L>) -> Self::Value {
        Substitution::rauzy_move(edge.permutation, edge.winner).unwrap_or_else(|| self.identity(diagram))
    }

    fn combine(&self, acc: Self::Value, edge: Self::Value) -> Self::Value {
        acc.compose(&edge)
    }
}

/// Elementary matrices of the moves: the identity plus a one at
/// `(winner, loser)`, letters indexed by the alphabet.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatrixCocycle;

impl<L: Clone + Eq + Hash> Cocycle<L> for MatrixCocycle {
    type Value = DMatrix<i64>;

    fn identity(&self, diagram: &RauzyDiagram<L>) -> Self::Value {
        let n = diagram.alphabet().map_or(0, |a| a.len());
        DMatrix::identity(n, n)
    }

    fn edge_value(&self, diagram: &RauzyDiagram<L>, edge: Edge<'_, L>) -> Self::Value {
        let mut m = self.identity(diagram);
        let alphabet = edge.permutation.alphabet();
        let winner = edge
            .permutation
            .winner_letter(edge.winner)
            .and_then(|l| alphabet.get_index_of(l));
        let loser = edge
            .permutation
            .loser_letter(edge.winner)
            .and_then(|l| alphabet.get_index_of(l));
        if let (Some(w), Some(l)) = (winner, loser) {
            m[(w, l)] = 1;
        }
        m
    }

    fn combine(&self, acc: Self::Value, edge: Self::Value) -> Self::Value {
        acc * edge
    }
}

/// The winner letter of every move, in order.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinnerCocycle;

impl<L: Clone> Cocycle<L> for WinnerCocycle {
    type Value = Vec<L>;

    fn identity(&self, _diagram: &RauzyDiagram<L>) -> Self::Value {
        Vec::new()
    }

    fn edge_value(&self, _diagram: &RauzyDiagram<L>, edge: Edge<'_, L>) -> Self::Value {
        edge.permutation.winner_letter(edge.winner).cloned().into_iter().collect()
    }

    fn combine(&self, mut acc: Self::Value, edge: Self::Value) -> Self::Value {
        acc.extend(edge);
        acc
    }
}

/// The loser letter of every move, in order.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoserCocycle;

impl<L: Clone> Cocycle<L> for LoserCocycle {
    type Value = Vec<L>;

    fn identity(&self, _diagram: &RauzyDiagram<L>) -> Self::Value {
        Vec::new()
    }

    fn edge_value(&self, _diagram: &RauzyDiagram<L>, edge: Edge<'_, L>) -> Self::Value {
        edge.permutation.loser_letter(edge.winner).cloned().into_iter().collect()
    }

    fn combine(&self, mut acc: Self::Value, edge: Self::Value) -> Self::Value {
        acc.extend(edge);
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramBuilder;

    fn chars(s: &str) -> Vec<char> {
        s.split_whitespace().flat_map(|w| w.chars()).collect()
    }

    fn diagram(top: &str, bottom: &str) -> RauzyDiagram<char> {
        RauzyDiagram::build(&Permutation::new(chars(top), chars(bottom)).unwrap())
    }

    #[test]
    fn empty_walk_is_the_identity() {
        let d = diagram("a b c", "c b a");
        let walk = Walk::new(VertexId(1));
        assert!(walk.is_empty());
        assert_eq!(
            d.path_to_substitution(&walk).unwrap(),
            Substitution::identity(&['a', 'b', 'c'])
        );
        assert_eq!(d.path_to_matrix(&walk).unwrap(), DMatrix::<i64>::identity(3, 3));
        assert!(d.path_to_winners(&walk).unwrap().is_empty());
    }

    #[test]
    fn two_step_walk() {
        let d = diagram("a b c", "c b a");
        let walk = Walk::new(VertexId(0)).then(Row::Top).then(Row::Bottom);

        let s = d.path_to_substitution(&walk).unwrap();
        assert_eq!(
            s,
            Substitution::from_images([
                ('a', vec!['a', 'c']),
                ('b', vec!['b']),
                ('c', vec!['b', 'c']),
            ])
        );

        let m = d.path_to_matrix(&walk).unwrap();
        assert_eq!(
            m,
            DMatrix::from_row_slice(3, 3, &[1, 0, 0, 0, 1, 1, 1, 0, 1])
        );

        assert_eq!(d.path_to_winners(&walk).unwrap(), vec!['c', 'b']);
        assert_eq!(d.path_to_losers(&walk).unwrap(), vec!['a', 'c']);
    }

    #[test]
    fn repeated_loops() {
        let d = diagram("a b c", "c b a");
        let walk = Walk::new(VertexId(0)).then(Row::Top).repeat(Row::Bottom, 3);
        assert_eq!(walk.len(), 4);
        assert_eq!(d.path_to_winners(&walk).unwrap(), vec!['c', 'b', 'b', 'b']);
        assert_eq!(
            d.path_to_substitution(&walk).unwrap().image(&'c'),
            Some(&['b', 'b', 'b', 'c'][..])
        );
    }

    #[test]
    fn missing_edge_stops_the_walk() {
        let d = DiagramBuilder::labeled().build(
            &Permutation::new(chars("a b b"), chars("c c a")).unwrap(),
        );
        let walk = Walk::new(VertexId(0)).then(Row::Top).then(Row::Top);
        assert_eq!(
            d.path_to_winners(&walk),
            Err(DiagramError::Neighbour {
                vertex: VertexId(1),
                winner: Row::Top,
                target: crate::diagram::EdgeTarget::Missing,
            })
        );
        assert_eq!(
            d.path_to_winners(&Walk::new(VertexId(40))),
            Err(DiagramError::UnknownVertex(VertexId(40)))
        );
    }

    #[test]
    fn reduced_diagrams_have_no_cocycles() {
        let seed = Permutation::new(chars("a b c"), chars("c b a")).unwrap();
        let walk = Walk::new(VertexId(0)).repeat(Row::Bottom, 2);

        let labeled = DiagramBuilder::labeled().build(&seed);
        assert_eq!(
            labeled.path_to_substitution(&walk).unwrap(),
            Substitution::from_images([
                ('a', vec!['a']),
                ('b', vec!['a', 'b']),
                ('c', vec!['a', 'c']),
            ])
        );

        let reduced = DiagramBuilder::reduced().build(&seed);
        assert_eq!(reduced.path_to_substitution(&walk), Err(DiagramError::Unlabeled));
        assert_eq!(reduced.path_to_matrix(&walk), Err(DiagramError::Unlabeled));
        assert_eq!(reduced.path_to_winners(&walk), Err(DiagramError::Unlabeled));
        assert_eq!(
            reduced.path_value(&Walk::new(VertexId(0)), &LoserCocycle),
            Err(DiagramError::Unlabeled)
        );
        // plain folds still run
        let steps = path_cocycle(&reduced, &walk, |e| usize::from(e.is_some()), |a, b| a + b);
        assert_eq!(steps, Ok(2));
    }

    #[test]
    fn custom_fold_counts_edges() {
        let d = diagram("a b c d", "d c b a");
        let walk = Walk::new(VertexId(0))
            .then(Row::Top)
            .then(Row::Bottom)
            .repeat(Row::Top, 2);
        let count = path_cocycle(&d, &walk, |e| usize::from(e.is_some()), |a, b| a + b).unwrap();
        assert_eq!(count, walk.len());
    }

    #[test]
    fn substitution_monoid() {
        let f = Substitution::from_images([('a', vec!['a', 'b'])]);
        let g = Substitution::from_images([('b', vec!['a'])]);
        assert_eq!(f.apply(&['a', 'b', 'c']), vec!['a', 'b', 'b', 'c']);
        let fg = &f * &g;
        assert_eq!(fg.image(&'b'), Some(&['a', 'b'][..]));
        assert_eq!(fg.image(&'a'), Some(&['a', 'b'][..]));
        let gf = g.compose(&f);
        assert_eq!(gf.image(&'a'), Some(&['a', 'a'][..]));
        assert_eq!(gf.image(&'b'), Some(&['a'][..]));
    }

    #[test]
    fn matrices_count_letters_of_images() {
        let d = diagram("a b c d", "d c b a");
        let walk = Walk::new(VertexId(0))
            .then(Row::Top)
            .then(Row::Bottom)
            .then(Row::Bottom)
            .then(Row::Top);
        let s = d.path_to_substitution(&walk).unwrap();
        let m = d.path_to_matrix(&walk).unwrap();
        let alphabet = d.alphabet().unwrap();
        for (j, letter) in alphabet.iter().enumerate() {
            let image = s.image(letter).unwrap();
            for (i, other) in alphabet.iter().enumerate() {
                let count = image.iter().filter(|l| *l == other).count() as i64;
                assert_eq!(m[(i, j)], count, "{other} in the image of {letter}");
            }
        }
    }
}
