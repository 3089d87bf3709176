//! Content-model expressions.
//!
//! An [`Expression`] is a regular expression over particles. Callers build
//! one per content model with atoms labelled by whatever identifies a
//! particle to them; [`crate::Graph::new`] consumes it.
//!
//! Once interned by the graph, atoms carry [`PositionId`]s and the tree
//! exposes the Glushkov quantities used to wire the position graph:
//! nullability, FIRST and LAST sets, and [`Expression::build_dag`].

use std::collections::HashMap;
use std::hash::Hash;

use crate::position::{Arena, Position, PositionId, PositionKind, PositionSet};

/// A regular expression over particles.
///
/// Sequences and choices are n-ary: a flat list of a thousand particles is
/// one node with a thousand operands, not a thousand nested pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<T> {
    /// Matches the empty sequence.
    Epsilon,
    /// A single particle.
    Atom(T),
    /// Each operand in turn. An empty sequence matches like epsilon.
    Sequence(Vec<Self>),
    /// Any one operand. An empty choice matches like epsilon.
    Choice(Vec<Self>),
    /// Zero or one occurrence.
    Optional(Box<Self>),
    /// Zero or more occurrences.
    ZeroOrMore(Box<Self>),
    /// One or more occurrences.
    OneOrMore(Box<Self>),
}

impl<T> Expression<T> {
    pub const EPSILON: Self = Self::Epsilon;

    #[must_use]
    pub const fn atom(label: T) -> Self {
        Self::Atom(label)
    }

    /// `lhs` followed by `rhs`. Appends to `lhs` when it is already a
    /// sequence, so left folds stay flat.
    #[must_use]
    pub fn sequence(lhs: Self, rhs: Self) -> Self {
        match lhs {
            Self::Sequence(mut items) => {
                items.push(rhs);
                Self::Sequence(items)
            }
            lhs => Self::Sequence(vec![lhs, rhs]),
        }
    }

    /// `lhs` or `rhs`. Appends to `lhs` when it is already a choice.
    #[must_use]
    pub fn choice(lhs: Self, rhs: Self) -> Self {
        match lhs {
            Self::Choice(mut alts) => {
                alts.push(rhs);
                Self::Choice(alts)
            }
            lhs => Self::Choice(vec![lhs, rhs]),
        }
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn zero_or_more(inner: Self) -> Self {
        Self::ZeroOrMore(Box::new(inner))
    }

    #[must_use]
    pub fn one_or_more(inner: Self) -> Self {
        Self::OneOrMore(Box::new(inner))
    }

    /// Sequence of `items`. An empty iterator yields epsilon and a single
    /// item is returned as is.
    #[must_use]
    pub fn sequence_of<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::flatten(items.into_iter().collect(), Self::Sequence)
    }

    /// Choice between `items`. An empty iterator yields epsilon and a single
    /// item is returned as is.
    #[must_use]
    pub fn choice_of<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::flatten(items.into_iter().collect(), Self::Choice)
    }

    fn flatten(mut items: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        if items.len() > 1 {
            wrap(items)
        } else {
            items.pop().unwrap_or(Self::Epsilon)
        }
    }

    /// Return `true` if this expression can match the empty sequence.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Epsilon | Self::Optional(_) | Self::ZeroOrMore(_) => true,
            Self::Atom(_) => false,
            Self::Sequence(items) => items.iter().all(Self::is_nullable),
            Self::Choice(alts) => alts.is_empty() || alts.iter().any(Self::is_nullable),
            Self::OneOrMore(inner) => inner.is_nullable(),
        }
    }

    /// Atom labels in left-to-right tree order, duplicates included.
    #[must_use]
    pub fn atoms(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Self::Epsilon => {}
            Self::Atom(label) => out.push(label),
            Self::Sequence(items) | Self::Choice(items) => {
                for item in items {
                    item.collect_atoms(out);
                }
            }
            Self::Optional(inner) | Self::ZeroOrMore(inner) | Self::OneOrMore(inner) => {
                inner.collect_atoms(out);
            }
        }
    }

    /// Rebuild the tree with every atom label passed through `f`.
    pub fn map_atoms<U, F: FnMut(T) -> U>(self, f: &mut F) -> Expression<U> {
        match self {
            Self::Epsilon => Expression::Epsilon,
            Self::Atom(label) => Expression::Atom(f(label)),
            Self::Sequence(items) => Expression::Sequence(
                items.into_iter().map(|item| item.map_atoms(&mut *f)).collect(),
            ),
            Self::Choice(alts) => Expression::Choice(
                alts.into_iter().map(|alt| alt.map_atoms(&mut *f)).collect(),
            ),
            Self::Optional(inner) => Expression::optional(inner.map_atoms(f)),
            Self::ZeroOrMore(inner) => Expression::zero_or_more(inner.map_atoms(f)),
            Self::OneOrMore(inner) => Expression::one_or_more(inner.map_atoms(f)),
        }
    }
}

impl<T: Eq + Hash + Clone> Expression<T> {
    /// Replace labels with arena positions, allocating one position per
    /// distinct label. Repeated labels share their position.
    pub(crate) fn intern(
        self,
        arena: &mut Arena<T>,
        index: &mut HashMap<T, PositionId>,
    ) -> Expression<PositionId> {
        self.map_atoms(&mut |label: T| {
            *index.entry(label.clone()).or_insert_with(|| {
                arena.add_node(Position::new(PositionKind::Particle(label)))
            })
        })
    }
}

impl Expression<PositionId> {
    /// Positions that can be matched first.
    #[must_use]
    pub fn first_set(&self) -> PositionSet {
        match self {
            Self::Epsilon => PositionSet::EMPTY,
            Self::Atom(id) => PositionSet::singleton(*id),
            Self::Sequence(items) => {
                let mut first = PositionSet::EMPTY;
                for item in items {
                    first.extend(&item.first_set());
                    if !item.is_nullable() {
                        break;
                    }
                }
                first
            }
            Self::Choice(alts) => alts.iter().flat_map(Self::first_set).collect(),
            Self::Optional(inner) | Self::ZeroOrMore(inner) | Self::OneOrMore(inner) => {
                inner.first_set()
            }
        }
    }

    /// Positions that can be matched last.
    #[must_use]
    pub fn last_set(&self) -> PositionSet {
        match self {
            Self::Epsilon => PositionSet::EMPTY,
            Self::Atom(id) => PositionSet::singleton(*id),
            Self::Sequence(items) => {
                let mut last = PositionSet::EMPTY;
                for item in items.iter().rev() {
                    last.extend(&item.last_set());
                    if !item.is_nullable() {
                        break;
                    }
                }
                last
            }
            Self::Choice(alts) => alts.iter().flat_map(Self::last_set).collect(),
            Self::Optional(inner) | Self::ZeroOrMore(inner) | Self::OneOrMore(inner) => {
                inner.last_set()
            }
        }
    }

    /// Wire edges so that every position in `incoming` leads to each FIRST
    /// position of this expression, and recursively inside it.
    ///
    /// Returns the positions the expression may end on given `incoming`:
    /// its LAST set, plus `incoming` itself when the expression is nullable.
    /// A sequence threads that set from one operand into the next.
    ///
    /// Repetition feeds the operand's own LAST set back into its FIRST set,
    /// which is where self-loops and multi-position cycles come from.
    pub(crate) fn build_dag<T>(&self, incoming: &PositionSet, arena: &mut Arena<T>) -> PositionSet {
        match self {
            Self::Epsilon => incoming.clone(),
            Self::Atom(id) => {
                incoming.connect_to(*id, arena);
                PositionSet::singleton(*id)
            }
            Self::Sequence(items) => {
                let mut outgoing = incoming.clone();
                for item in items {
                    outgoing = item.build_dag(&outgoing, arena);
                }
                outgoing
            }
            Self::Choice(alts) if alts.is_empty() => incoming.clone(),
            Self::Choice(alts) => {
                let mut outgoing = PositionSet::EMPTY;
                for alt in alts {
                    outgoing.extend(&alt.build_dag(incoming, arena));
                }
                outgoing
            }
            Self::Optional(inner) => {
                let mut outgoing = inner.build_dag(incoming, arena);
                outgoing.extend(incoming);
                outgoing
            }
            Self::ZeroOrMore(inner) => {
                let looped = PositionSet::union(incoming, &inner.last_set()).into_owned();
                let mut outgoing = inner.build_dag(&looped, arena);
                outgoing.extend(incoming);
                outgoing
            }
            Self::OneOrMore(inner) => {
                let looped = PositionSet::union(incoming, &inner.last_set()).into_owned();
                inner.build_dag(&looped, arena)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type E = Expression<&'static str>;

    fn a() -> E {
        E::atom("a")
    }

    fn b() -> E {
        E::atom("b")
    }

    fn interned(expr: E) -> (Arena<&'static str>, HashMap<&'static str, PositionId>, Expression<PositionId>) {
        let mut arena = Arena::new();
        let mut index = HashMap::new();
        let tree = expr.intern(&mut arena, &mut index);
        (arena, index, tree)
    }

    #[test]
    fn nullability_follows_combinators() {
        assert!(E::EPSILON.is_nullable());
        assert!(!a().is_nullable());
        assert!(!E::sequence(a(), E::optional(b())).is_nullable());
        assert!(E::sequence(E::optional(a()), E::zero_or_more(b())).is_nullable());
        assert!(E::choice(a(), E::EPSILON).is_nullable());
        assert!(!E::choice(a(), b()).is_nullable());
        assert!(!E::one_or_more(a()).is_nullable());
        assert!(E::one_or_more(E::optional(a())).is_nullable());
    }

    #[test]
    fn empty_folds_are_epsilon() {
        assert_eq!(E::sequence_of(Vec::new()), E::Epsilon);
        assert_eq!(E::choice_of(Vec::new()), E::Epsilon);
        assert_eq!(E::sequence_of([a()]), a());
    }

    #[test]
    fn binary_constructors_append_to_flat_lists() {
        let seq = E::sequence(E::sequence(a(), b()), E::atom("c"));
        assert_eq!(seq, E::Sequence(vec![a(), b(), E::atom("c")]));

        let alt = E::choice(E::choice(a(), b()), E::EPSILON);
        assert_eq!(alt, E::Choice(vec![a(), b(), E::EPSILON]));

        // A sequence on the right stays a nested operand.
        let nested = E::sequence(a(), E::sequence(b(), a()));
        assert_eq!(nested, E::Sequence(vec![a(), E::Sequence(vec![b(), a()])]));
    }

    #[test]
    fn empty_lists_behave_like_epsilon() {
        assert!(E::Sequence(Vec::new()).is_nullable());
        assert!(E::Choice(Vec::new()).is_nullable());

        let mut arena = Arena::<&str>::new();
        let x = arena.add_node(Position::new(PositionKind::Particle("x")));
        let incoming = PositionSet::singleton(x);
        let outgoing = Expression::<PositionId>::Choice(Vec::new()).build_dag(&incoming, &mut arena);

        assert_eq!(outgoing, incoming);
        assert_eq!(arena.edge_count(), 0);
    }

    #[test]
    fn atoms_lists_labels_in_tree_order() {
        let expr = E::sequence(E::choice(a(), b()), E::one_or_more(a()));
        assert_eq!(expr.atoms(), vec![&"a", &"b", &"a"]);
    }

    #[test]
    fn interning_shares_positions_between_equal_labels() {
        let (arena, index, tree) = interned(E::sequence_of([a(), b(), a()]));

        assert_eq!(arena.node_count(), 2);
        assert_eq!(tree.atoms(), vec![&index["a"], &index["b"], &index["a"]]);
    }

    #[test]
    fn last_set_of_sequence_includes_lhs_only_when_rhs_nullable() {
        let (_, index, tree) = interned(E::sequence(a(), E::optional(b())));
        let last = tree.last_set();
        assert!(last.contains(index["a"]) && last.contains(index["b"]));

        let (_, index, tree) = interned(E::sequence(a(), b()));
        assert_eq!(tree.last_set(), PositionSet::singleton(index["b"]));
    }

    #[test]
    fn first_set_of_sequence_skips_over_nullable_lhs() {
        let (_, index, tree) = interned(E::sequence(E::zero_or_more(a()), b()));
        let first = tree.first_set();
        assert_eq!(first.len(), 2);
        assert!(first.contains(index["a"]) && first.contains(index["b"]));
    }

    #[test]
    fn epsilon_has_empty_sets() {
        let (_, _, tree) = interned(E::EPSILON);
        assert!(tree.first_set().is_empty());
        assert!(tree.last_set().is_empty());
    }

    #[test]
    fn repetition_introduces_self_loop() {
        let (mut arena, index, tree) = interned(E::one_or_more(a()));
        tree.build_dag(&PositionSet::EMPTY, &mut arena);

        assert!(arena[index["a"]].has_self_loop());
        assert_eq!(arena.edge_count(), 1);
    }

    #[test]
    fn repeated_sequence_closes_a_cycle() {
        let (mut arena, index, tree) = interned(E::one_or_more(E::sequence(a(), b())));
        tree.build_dag(&PositionSet::EMPTY, &mut arena);

        assert!(arena.contains_edge(index["a"], index["b"]));
        assert!(arena.contains_edge(index["b"], index["a"]));
        assert!(!arena[index["a"]].has_self_loop());
    }

    #[test]
    fn build_dag_returns_last_plus_incoming_when_nullable() {
        let (mut arena, index, tree) = interned(E::sequence_of([a(), E::optional(b())]));
        let outgoing = tree.build_dag(&PositionSet::EMPTY, &mut arena);
        assert_eq!(outgoing, [index["a"], index["b"]].into_iter().collect::<PositionSet>());

        let (mut arena, index, tree) = interned(E::zero_or_more(a()));
        let x = arena.add_node(Position::new(PositionKind::Particle("x")));
        let outgoing = tree.build_dag(&PositionSet::singleton(x), &mut arena);
        assert_eq!(outgoing, [index["a"], x].into_iter().collect::<PositionSet>());
    }

    #[test]
    fn long_flat_sequence_wires_a_chain() {
        let labels: Vec<String> = (0..50_000).map(|i| format!("p{i}")).collect();
        let mut arena = Arena::new();
        let mut index = HashMap::new();
        let tree = Expression::sequence_of(labels.iter().cloned().map(Expression::atom))
            .intern(&mut arena, &mut index);

        assert!(!tree.is_nullable());
        assert_eq!(tree.first_set(), PositionSet::singleton(index["p0"]));
        assert_eq!(tree.last_set(), PositionSet::singleton(index["p49999"]));

        let outgoing = tree.build_dag(&PositionSet::EMPTY, &mut arena);
        assert_eq!(outgoing, PositionSet::singleton(index["p49999"]));
        assert_eq!(arena.edge_count(), 49_999);
    }

    #[test]
    fn nullable_lhs_forwards_incoming_to_rhs() {
        let mut arena = Arena::new();
        let mut index = HashMap::new();
        let tree = E::sequence_of([E::atom("x"), E::optional(a()), b()]).intern(&mut arena, &mut index);
        tree.build_dag(&PositionSet::EMPTY, &mut arena);

        assert!(arena.contains_edge(index["x"], index["a"]));
        assert!(arena.contains_edge(index["x"], index["b"]));
        assert!(arena.contains_edge(index["a"], index["b"]));
    }
}
