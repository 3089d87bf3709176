//! Matchable grammar positions and the sets used to wire them together.
//!
//! Positions live in a petgraph arena owned by [`crate::Graph`]. An edge
//! `p → q` means "after matching `p`, `q` may be matched next". The arena is
//! cyclic whenever the content model repeats something.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Cow;
use std::collections::BTreeSet;

use petgraph::graph::{DiGraph, NodeIndex};

/// Index of a [`Position`] inside its graph's arena.
pub type PositionId = NodeIndex;

/// Arena holding every position of one analysis.
pub(crate) type Arena<T> = DiGraph<Position<T>, ()>;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// What a position stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PositionKind<T> {
    /// Synthetic entry point placed before the content model.
    Source,
    /// Synthetic exit point placed after the content model.
    Sink,
    /// A caller atom, identified by its label.
    Particle(T),
}

/// One node of the position graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position<T> {
    kind: PositionKind<T>,
    post_order: Option<usize>,
    self_loop: bool,
}

impl<T> Position<T> {
    pub(crate) const fn new(kind: PositionKind<T>) -> Self {
        Self {
            kind,
            post_order: None,
            self_loop: false,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &PositionKind<T> {
        &self.kind
    }

    /// The caller label, or `None` for the source and sink sentinels.
    #[must_use]
    pub const fn label(&self) -> Option<&T> {
        match &self.kind {
            PositionKind::Particle(label) => Some(label),
            PositionKind::Source | PositionKind::Sink => None,
        }
    }

    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self.kind, PositionKind::Source)
    }

    #[must_use]
    pub const fn is_sink(&self) -> bool {
        matches!(self.kind, PositionKind::Sink)
    }

    /// Return `true` for the source and sink sentinels.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        !matches!(self.kind, PositionKind::Particle(_))
    }

    /// Finishing index from the source-rooted DFS.
    ///
    /// `None` only for positions the DFS never reached, which a well-formed
    /// graph does not contain.
    #[must_use]
    pub const fn post_order(&self) -> Option<usize> {
        self.post_order
    }

    /// Return `true` if this position has an edge to itself.
    #[must_use]
    pub const fn has_self_loop(&self) -> bool {
        self.self_loop
    }

    pub(crate) const fn set_post_order(&mut self, index: usize) {
        self.post_order = Some(index);
    }
}

// ---------------------------------------------------------------------------
// PositionSet
// ---------------------------------------------------------------------------

/// A set of positions used while wiring edges (LAST sets, FOLLOW
/// accumulation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSet {
    members: BTreeSet<PositionId>,
}

impl PositionSet {
    /// The empty set. Connecting it to anything is a no-op.
    pub const EMPTY: Self = Self {
        members: BTreeSet::new(),
    };

    #[must_use]
    pub fn singleton(id: PositionId) -> Self {
        Self {
            members: BTreeSet::from([id]),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn contains(&self, id: PositionId) -> bool {
        self.members.contains(&id)
    }

    /// Iterate members in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.members.iter().copied()
    }

    /// Return `true` if every member of `other` is also in `self`.
    ///
    /// Callers may only rely on a `true` answer; `false` must always be safe
    /// to act on. This implementation is exact.
    #[must_use]
    pub fn contains_all(&self, other: &Self) -> bool {
        self.members.is_superset(&other.members)
    }

    /// Union of two sets, borrowing whichever operand already covers the
    /// other.
    #[must_use]
    pub fn union<'a>(a: &'a Self, b: &'a Self) -> Cow<'a, Self> {
        if a.contains_all(b) {
            return Cow::Borrowed(a);
        }
        if b.contains_all(a) {
            return Cow::Borrowed(b);
        }
        Cow::Owned(Self {
            members: a.members.union(&b.members).copied().collect(),
        })
    }

    /// Add every member of `other` to `self`.
    pub fn extend(&mut self, other: &Self) {
        self.members.extend(other.iter());
    }

    /// Add an edge `p → target` for every member `p`.
    ///
    /// Existing edges are left alone, so calling this twice is harmless.
    pub(crate) fn connect_to<T>(&self, target: PositionId, arena: &mut Arena<T>) {
        for from in self.iter() {
            arena.update_edge(from, target, ());
            if from == target {
                arena[target].self_loop = true;
            }
        }
    }
}

impl FromIterator<PositionId> for PositionSet {
    fn from_iter<I: IntoIterator<Item = PositionId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PositionSet {
    type Item = PositionId;
    type IntoIter = std::collections::btree_set::IntoIter<PositionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a PositionSet {
    type Item = PositionId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, PositionId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter().copied()
    }
}
