#![forbid(unsafe_code)]
//! cardinal-core library.
//!
//! Infers, for every particle of a content model, whether it may occur more
//! than once (collection) and whether it must occur at all (required).
//!
//! ```text
//! Expression<T>            caller-built content model
//!        ↓  Graph::new()
//! position graph           source · body · sink, Glushkov edges
//!        ↓  DFS postorder + Kosaraju
//! ConnectedComponent list  one per SCC
//!        ↓  cut-set pass
//! is_required / is_collection per component
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library failures, `anyhow::Result` at
//!   the configuration boundary.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod expr;
pub mod graph;
pub mod notation;
pub mod position;

pub use config::{AnalysisConfig, CutSetStrategy};
pub use error::GraphError;
pub use expr::Expression;
pub use graph::{Cardinality, ConnectedComponent, Graph};
pub use notation::{NotationError, parse};
pub use position::{Position, PositionId, PositionKind, PositionSet};
