//! Position graph construction and classification.
//!
//! # Overview
//!
//! [`Graph`] turns one content-model [`Expression`] into a classified list
//! of [`ConnectedComponent`]s. The whole analysis runs inside the
//! constructor; a `Graph` value is always fully analysed.
//!
//! ## Pipeline
//!
//! ```text
//! Expression<T>
//!        ↓  intern labels          one position per distinct label
//! source · body · sink
//!        ↓  build_dag({source})   Glushkov edges, self-loops from repetition
//! position graph (may be cyclic)
//!        ↓  scc::assign_post_order
//!        ↓  scc::strongly_connected
//! Vec<ConnectedComponent>
//!        ↓  cutset::required_flags
//! is_required per component
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use cardinal_core::{Expression, Graph};
//!
//! // (a, b)+ , c?
//! let body = Expression::sequence(
//!     Expression::one_or_more(Expression::sequence(
//!         Expression::atom("a"),
//!         Expression::atom("b"),
//!     )),
//!     Expression::optional(Expression::atom("c")),
//! );
//! let graph = Graph::new(body);
//!
//! for cc in graph.particle_components() {
//!     let labels: Vec<_> = graph.labels(cc).collect();
//!     println!("{labels:?} required={} collection={}", cc.is_required(), cc.is_collection());
//! }
//! ```

pub mod component;
mod cutset;
mod scc;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::config::{AnalysisConfig, CutSetStrategy};
use crate::error::GraphError;
use crate::expr::Expression;
use crate::position::{Arena, Position, PositionId, PositionKind, PositionSet};

pub use component::{Cardinality, ConnectedComponent};

/// An analysed position graph.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    arena: Arena<T>,
    source: PositionId,
    sink: PositionId,
    body: Expression<PositionId>,
    labels: HashMap<T, PositionId>,
    components: Vec<ConnectedComponent>,
    /// Component index per arena index; `None` for unreached positions.
    component_of: Vec<Option<usize>>,
    strategy: CutSetStrategy,
}

/// Interned input, before any edges exist.
struct Interned<T> {
    arena: Arena<T>,
    source: PositionId,
    sink: PositionId,
    body: Expression<PositionId>,
    labels: HashMap<T, PositionId>,
}

impl<T: Eq + Hash + Clone> Graph<T> {
    /// Analyse `body` with the default configuration.
    ///
    /// Atoms with equal labels share one position. The expression is
    /// consumed; a tree feeds exactly one graph.
    #[must_use]
    pub fn new(body: Expression<T>) -> Self {
        Self::analyze(Self::intern(body), CutSetStrategy::default())
    }

    /// Analyse `body` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyPositions`] when the content model has
    /// more distinct particles than `config.max_positions` allows.
    pub fn with_config(body: Expression<T>, config: &AnalysisConfig) -> Result<Self, GraphError> {
        let interned = Self::intern(body);
        if let Some(limit) = config.max_positions {
            let count = interned.labels.len();
            if count > limit {
                return Err(GraphError::TooManyPositions { count, limit });
            }
        }
        Ok(Self::analyze(interned, config.cut_set))
    }

    fn intern(body: Expression<T>) -> Interned<T> {
        let mut arena = Arena::new();
        let mut labels = HashMap::new();
        let source = arena.add_node(Position::new(PositionKind::Source));
        let body = body.intern(&mut arena, &mut labels);
        let sink = arena.add_node(Position::new(PositionKind::Sink));
        Interned {
            arena,
            source,
            sink,
            body,
            labels,
        }
    }
}

impl<T> Graph<T> {
    #[instrument(skip_all, fields(particles = interned.labels.len(), ?strategy))]
    fn analyze(interned: Interned<T>, strategy: CutSetStrategy) -> Self {
        let Interned {
            mut arena,
            source,
            sink,
            body,
            labels,
        } = interned;

        // source · body · sink: the body starts after the source, and
        // whatever it may end on leads to the sink.
        body.build_dag(&PositionSet::singleton(source), &mut arena)
            .connect_to(sink, &mut arena);

        let post_order = scc::assign_post_order(&mut arena, source);
        debug_assert_eq!(
            post_order.len(),
            arena.node_count(),
            "every position is reachable from the source"
        );

        let mut component_of = vec![None; arena.node_count()];
        let components: Vec<ConnectedComponent> = scc::strongly_connected(&arena, &post_order)
            .into_iter()
            .enumerate()
            .map(|(index, members)| {
                for id in &members {
                    component_of[id.index()] = Some(index);
                }
                ConnectedComponent::new(members, &arena)
            })
            .collect();

        let mut graph = Self {
            arena,
            source,
            sink,
            body,
            labels,
            components,
            component_of,
            strategy,
        };
        graph.recompute_required();

        debug!(
            positions = graph.arena.node_count(),
            edges = graph.arena.edge_count(),
            components = graph.components.len(),
            "position graph analysed"
        );
        graph
    }

    /// Re-run the cut-set pass. The graph never changes after construction,
    /// so this always reproduces the existing flags.
    pub fn recompute_required(&mut self) {
        let flags = cutset::required_flags(
            &self.arena,
            self.source,
            self.sink,
            &self.components,
            &self.component_of,
            self.strategy,
        );
        for (cc, required) in self.components.iter_mut().zip(flags) {
            cc.set_required(required);
        }
    }

    /// All components, sentinel components included, in discovery order.
    #[must_use]
    pub fn components(&self) -> &[ConnectedComponent] {
        &self.components
    }

    /// Components made of caller particles only.
    pub fn particle_components(&self) -> impl Iterator<Item = &ConnectedComponent> {
        self.components.iter().filter(|cc| !cc.is_sentinel())
    }

    /// The component containing `id`.
    #[must_use]
    pub fn component_of(&self, id: PositionId) -> Option<&ConnectedComponent> {
        self.component_of
            .get(id.index())
            .copied()
            .flatten()
            .map(|index| &self.components[index])
    }

    #[must_use]
    pub fn position(&self, id: PositionId) -> Option<&Position<T>> {
        self.arena.node_weight(id)
    }

    /// Every position with its id, sentinels included.
    pub fn positions(&self) -> impl Iterator<Item = (PositionId, &Position<T>)> {
        self.arena
            .node_indices()
            .map(move |id| (id, &self.arena[id]))
    }

    /// Direct successors of `id`.
    pub fn successors(&self, id: PositionId) -> impl Iterator<Item = PositionId> + '_ {
        self.arena.neighbors(id)
    }

    #[must_use]
    pub const fn source(&self) -> PositionId {
        self.source
    }

    #[must_use]
    pub const fn sink(&self) -> PositionId {
        self.sink
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        self.arena.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.arena.edge_count()
    }

    /// The caller's content model with labels replaced by position ids.
    #[must_use]
    pub const fn body(&self) -> &Expression<PositionId> {
        &self.body
    }

    #[must_use]
    pub const fn strategy(&self) -> CutSetStrategy {
        self.strategy
    }

    /// Labels of the particles in `cc`. Sentinels have no label.
    pub fn labels<'a>(&'a self, cc: &'a ConnectedComponent) -> impl Iterator<Item = &'a T> + 'a {
        cc.iter().filter_map(|id| self.arena[id].label())
    }

    /// Labels for a set of positions, e.g. [`Expression::first_set`].
    /// Sentinels and ids outside this graph are skipped.
    pub fn labels_of(&self, set: PositionSet) -> impl Iterator<Item = &T> + '_ {
        set.into_iter()
            .filter_map(|id| self.arena.node_weight(id).and_then(Position::label))
    }
}

impl<T: Eq + Hash> Graph<T> {
    /// Position assigned to the particle labelled `label`.
    #[must_use]
    pub fn position_of(&self, label: &T) -> Option<PositionId> {
        self.labels.get(label).copied()
    }

    /// Component of the particle labelled `label`.
    #[must_use]
    pub fn component_of_label(&self, label: &T) -> Option<&ConnectedComponent> {
        self.position_of(label).and_then(|id| self.component_of(id))
    }
}

/// One line per particle component: `[a, b]`, then `!` if required and `*`
/// if a collection.
impl<T: fmt::Display> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cc in self.particle_components() {
            write!(f, "[")?;
            for (i, label) in self.labels(cc).enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{label}")?;
            }
            write!(f, "]")?;
            if cc.is_required() {
                write!(f, "!")?;
            }
            if cc.is_collection() {
                write!(f, "*")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
