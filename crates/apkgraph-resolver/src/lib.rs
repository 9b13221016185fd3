mod closure;
mod graph;
mod types;

pub use closure::resolve;
pub use graph::{serialize, GRAPH_HEADER};
pub use types::{ClosureResult, DependencyEdge, ResolveError, UnresolvedDependency};
