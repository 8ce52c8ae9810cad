//! Ordering of assignments so that definitions come before their uses

mod error;
mod graph;
mod scc;
mod topological;


pub use self::{
    error::CyclicReferenceError,
    graph::{dependency_graph, Dependent},
    scc::dependency_sort,
    topological::topological_sort,
};
