//! Contiguity-graph neighborhood index
//!
//! Wraps a precomputed adjacency relation over spatial unit ids. The graph
//! construction itself (queen contiguity of tessellation polygons, street
//! segment adjacency) happens upstream; this crate only answers neighbor
//! lookups, closed neighborhoods, and higher-order transitive closures.
//!
//! The id universe of a graph must match the attribute table it is used
//! with; looking up an id absent from the graph is a contract violation and
//! fails with [`Error::UnitNotFound`](urbanmorph_core::Error).

mod contiguity;

pub use contiguity::{ContiguityGraph, Neighbors};
