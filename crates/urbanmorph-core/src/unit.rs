//! Unit identifier abstraction
//!
//! Spatial units (buildings, tessellation cells, street segments, network
//! nodes) are identified by stable keys. Tables, graphs, and engines are
//! generic over the key type instead of fixing an id representation.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Key type for spatial units.
///
/// Blanket-implemented for anything hashable, printable, and cheap enough to
/// clone: integer and string ids in practice. `Display` is required so that
/// lookup misses can report the offending id.
pub trait UnitKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> UnitKey for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}
