//! The d-uniform hypergraph model used by both the minimal-perfect-hash assignment path
//! (`graph::PhfGraph::assign`) and the collision-free partition path
//! (`graph::PhfGraph::collision_free_partition`), plus the d=2 displace decomposition
//! special case (`displace`).

pub mod displace;
pub mod edge;
pub mod graph;
pub mod matching;
pub mod node;

pub use displace::{displace_decompose, CombineMode};
pub use graph::{verify_assignment, PhfGraph};
