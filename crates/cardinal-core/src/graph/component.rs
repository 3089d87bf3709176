//! Strongly connected components of the position graph.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::position::{Arena, PositionId};

/// How often the particles of one component may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly once.
    One,
    /// At most once.
    ZeroOrOne,
    /// At least once, possibly more.
    OneOrMore,
    /// Any number of times, including none.
    ZeroOrMore,
}

impl Cardinality {
    #[must_use]
    pub const fn from_flags(required: bool, collection: bool) -> Self {
        match (required, collection) {
            (true, false) => Self::One,
            (false, false) => Self::ZeroOrOne,
            (true, true) => Self::OneOrMore,
            (false, true) => Self::ZeroOrMore,
        }
    }

    /// Regex-style suffix: `""`, `"?"`, `"+"` or `"*"`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::One => "",
            Self::ZeroOrOne => "?",
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }
}

/// One maximal SCC of the position graph.
///
/// Members are sorted by position index for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    members: Vec<PositionId>,
    collection: bool,
    sentinel: bool,
    required: bool,
}

impl ConnectedComponent {
    pub(crate) fn new<T>(mut members: Vec<PositionId>, arena: &Arena<T>) -> Self {
        debug_assert!(!members.is_empty(), "an SCC always has a member");
        members.sort_unstable();
        let collection = members.len() > 1 || arena[members[0]].has_self_loop();
        let sentinel = members.iter().any(|&id| arena[id].is_sentinel());
        Self {
            members,
            collection,
            sentinel,
            required: false,
        }
    }

    /// Return `true` if the particles of this component can match more than
    /// once: it is a cycle, or its single position loops on itself.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    /// Return `true` if every path from source to sink passes through this
    /// component.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Return `true` if this component holds the source or sink sentinel.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        Cardinality::from_flags(self.required, self.collection)
    }

    #[must_use]
    pub fn members(&self) -> &[PositionId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.members.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, id: PositionId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for API symmetry with [`Self::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) const fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl<'a> IntoIterator for &'a ConnectedComponent {
    type Item = PositionId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, PositionId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter().copied()
    }
}
