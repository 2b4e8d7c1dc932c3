//! # Rauzy diagrams
//!
//! The Rauzy diagram of a permutation is the directed graph of everything
//! reachable from it by Rauzy moves. Every vertex has two outgoing edges, one
//! per winner row, either of which may be missing.
//!
//! [`DiagramBuilder`] explores the diagram breadth first. Vertices are compared
//! either with their labels ([`Canonicalization::Labeled`]) or up to relabeling
//! ([`Canonicalization::Reduced`]), in which case each vertex is stored in its
//! [standardized](Permutation::standardized) form.

use std::{
    collections::VecDeque,
    fmt::{self, Display},
    hash::Hash,
};

use ahash::AHashMap;
use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::{
    define_indexed_vec,
    flip::Flips,
    involution::{Involution, Row},
    permutation::Permutation,
};

define_indexed_vec!(
    /// Index of a vertex of a [`RauzyDiagram`].
    pub struct VertexId;

    /// Storage indexed by [`VertexId`].
    pub struct VertexVec;
);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Canonicalization {
    /// Vertices are equal when their labeled rows and flips are.
    #[default]
    Labeled,
    /// Vertices are equal when their pairings and flips are.
    Reduced,
}

/// Head of an outgoing edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeTarget {
    /// The move does not exist.
    Missing,
    /// The move exists but leads to a reducible permutation, which the
    /// diagram leaves out.
    Reducible,
    Vertex(VertexId),
}

impl EdgeTarget {
    pub fn vertex(self) -> Option<VertexId> {
        match self {
            EdgeTarget::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// The vertex index, `-1` for a missing edge and `-2` for an edge to a
    /// reducible permutation.
    pub fn raw(self) -> isize {
        match self {
            EdgeTarget::Missing => -1,
            EdgeTarget::Reducible => -2,
            EdgeTarget::Vertex(v) => v.0 as isize,
        }
    }
}

impl Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("vertex {vertex} has no edge of type {winner} (target {target})")]
    Neighbour {
        vertex: VertexId,
        winner: Row,
        target: EdgeTarget,
    },
    #[error("vertex {0} is not in the diagram")]
    UnknownVertex(VertexId),
    /// Reduced vertices name their letters independently, so values on
    /// consecutive edges do not share an alphabet.
    #[error("cocycles need a labeled diagram")]
    Unlabeled,
}

/// Key under which a vertex is looked up while building.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Fingerprint<L> {
    Labeled([Vec<L>; 2], Option<Flips>),
    Reduced(Involution, Option<Flips>),
}

#[derive(Clone, Debug, Default)]
pub struct DiagramBuilder {
    canonicalization: Canonicalization,
    keep_reducible: bool,
}

impl DiagramBuilder {
    pub fn new(canonicalization: Canonicalization) -> Self {
        DiagramBuilder {
            canonicalization,
            keep_reducible: false,
        }
    }

    pub fn labeled() -> Self {
        Self::new(Canonicalization::Labeled)
    }

    pub fn reduced() -> Self {
        Self::new(Canonicalization::Reduced)
    }

    /// Keep the reducible permutations reached from a seed with flips. They
    /// are left out by default, with their edges marked
    /// [`EdgeTarget::Reducible`]. Seeds without flips always keep them.
    pub fn keep_reducible(mut self, keep: bool) -> Self {
        self.keep_reducible = keep;
        self
    }

    fn fingerprint<L: Clone>(&self, permutation: &Permutation<L>) -> Fingerprint<L> {
        let flips = permutation.flips().cloned();
        match self.canonicalization {
            Canonicalization::Labeled => {
                let [top, bottom] = permutation.rows();
                Fingerprint::Labeled([top.to_vec(), bottom.to_vec()], flips)
            }
            Canonicalization::Reduced => {
                Fingerprint::Reduced(permutation.involution().clone(), flips)
            }
        }
    }

    /// Explores the diagram of `seed`, which becomes vertex `0`.
    #[instrument(skip_all, fields(canonicalization = ?self.canonicalization))]
    pub fn build<L: Clone + Eq + Hash>(&self, seed: &Permutation<L>) -> RauzyDiagram<L> {
        let canonical = |p: Permutation<L>| match self.canonicalization {
            Canonicalization::Labeled => p,
            Canonicalization::Reduced => p.standardized(),
        };
        let skip_reducible = seed.is_flipped() && !self.keep_reducible;

        let mut vertices = VertexVec::new();
        let mut edges = VertexVec::new();
        let mut seen: AHashMap<Fingerprint<L>, VertexId> = AHashMap::new();
        let mut worklist = VecDeque::new();

        let start = canonical(seed.clone());
        seen.insert(self.fingerprint(&start), vertices.push(start));
        edges.push([EdgeTarget::Missing; 2]);
        worklist.push_back(VertexId(0));

        while let Some(current) = worklist.pop_front() {
            for winner in Row::BOTH {
                let source: &Permutation<L> = &vertices[current];
                if !source.is_rauzy_movable(winner) {
                    continue;
                }
                let mut next = source.clone();
                if next.rauzy_move(winner).is_err() {
                    continue;
                }
                if skip_reducible && next.is_reducible() {
                    edges[current][winner as usize] = EdgeTarget::Reducible;
                    continue;
                }

                let next = canonical(next);
                let fingerprint = self.fingerprint(&next);
                let target = match seen.get(&fingerprint) {
                    Some(&v) => v,
                    None => {
                        let v = vertices.push(next);
                        edges.push([EdgeTarget::Missing; 2]);
                        seen.insert(fingerprint, v);
                        worklist.push_back(v);
                        trace!(vertex = %v, from = %current, %winner, "new vertex");
                        v
                    }
                };
                edges[current][winner as usize] = EdgeTarget::Vertex(target);
            }
        }

        debug!(
            vertices = vertices.len(),
            edges = edges.iter().flat_map(|(_, e)| e).filter(|e| e.vertex().is_some()).count(),
            "rauzy diagram complete"
        );

        RauzyDiagram {
            vertices,
            edges,
            canonicalization: self.canonicalization,
        }
    }
}

/// Vertices and edges of a Rauzy diagram, immutable once built.
#[derive(Clone, Debug)]
pub struct RauzyDiagram<L> {
    vertices: VertexVec<Permutation<L>>,
    edges: VertexVec<[EdgeTarget; 2]>,
    canonicalization: Canonicalization,
}

impl<L: Clone + Eq + Hash> RauzyDiagram<L> {
    /// The labeled diagram of `seed`.
    pub fn build(seed: &Permutation<L>) -> Self {
        DiagramBuilder::labeled().build(seed)
    }

    /// The vertex equal to `permutation` under the diagram's canonicalization.
    pub fn position(&self, permutation: &Permutation<L>) -> Option<VertexId> {
        self.vertices
            .iter()
            .find(|(_, v)| match self.canonicalization {
                Canonicalization::Labeled => *v == permutation,
                Canonicalization::Reduced => v.reduced_eq(permutation),
            })
            .map(|(id, _)| id)
    }
}

impl<L> RauzyDiagram<L> {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn canonicalization(&self) -> Canonicalization {
        self.canonicalization
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Permutation<L>> {
        self.vertices.get(id)
    }

    pub fn edges(&self, id: VertexId) -> Option<[EdgeTarget; 2]> {
        self.edges.get(id).copied()
    }

    pub fn edge(&self, id: VertexId, winner: Row) -> Option<EdgeTarget> {
        self.edges(id).map(|e| e[winner as usize])
    }

    /// Head of the edge of type `winner` leaving `id`.
    pub fn neighbour(&self, id: VertexId, winner: Row) -> Result<VertexId, DiagramError> {
        let target = self
            .edge(id, winner)
            .ok_or(DiagramError::UnknownVertex(id))?;
        target.vertex().ok_or(DiagramError::Neighbour {
            vertex: id,
            winner,
            target,
        })
    }

    /// Letters of the seed, shared by every vertex.
    pub fn alphabet(&self) -> Option<&IndexSet<L>> {
        self.vertices.get(VertexId(0)).map(Permutation::alphabet)
    }

    pub fn iter_vertices(&self) -> impl Iterator<Item = (VertexId, &Permutation<L>)> {
        self.vertices.iter()
    }

    /// Existing edges as `(tail, winner, head)`.
    pub fn iter_edges(&self) -> impl Iterator<Item = (VertexId, Row, VertexId)> + '_ {
        self.edges.iter().flat_map(|(id, targets)| {
            Row::BOTH
                .into_iter()
                .filter_map(move |winner| targets[winner as usize].vertex().map(|head| (id, winner, head)))
        })
    }

    /// Adjacency in the raw form, one `[top, bottom]` pair per vertex.
    pub fn raw_edges(&self) -> Vec<[isize; 2]> {
        self.edges
            .iter()
            .map(|(_, targets)| targets.map(EdgeTarget::raw))
            .collect()
    }
}

impl<L: Display> Display for RauzyDiagram<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, vertex) in &self.vertices {
            if id.0 > 0 {
                writeln!(f)?;
            }
            let [top, bottom] = self.edges[id];
            let text = vertex.to_string().replace('\n', " / ");
            write!(f, "{id}: {text}  [{top}, {bottom}]")?;
        }
        Ok(())
    }
}
