//! Undirected contiguity graph over unit ids

use std::collections::{HashMap, VecDeque};
use std::fmt;

use urbanmorph_core::{Error, Result, UnitKey};

/// Undirected adjacency over spatial unit ids.
///
/// Ids keep their insertion order; adjacency is stored by internal index,
/// symmetrized, deduplicated, and free of self-loops. Neighbor order is
/// irrelevant to every consumer, but it is kept deterministic (sorted by
/// internal index) so that runs are reproducible byte for byte.
#[derive(Debug, Clone)]
pub struct ContiguityGraph<K: UnitKey> {
    ids: Vec<K>,
    index: HashMap<K, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl<K: UnitKey> ContiguityGraph<K> {
    /// Build from per-unit neighbor lists (the spatial-weights form).
    ///
    /// Every unit must appear as a key; a neighbor id that is not itself a
    /// key is a `UnitNotFound` error. Lists are symmetrized: `a -> b`
    /// implies `b -> a` even when only one direction is given.
    pub fn from_neighbor_lists<I, N>(lists: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, N)>,
        N: IntoIterator<Item = K>,
    {
        let lists: Vec<(K, Vec<K>)> = lists
            .into_iter()
            .map(|(id, ns)| (id, ns.into_iter().collect()))
            .collect();

        let mut graph = Self::with_ids(lists.iter().map(|(id, _)| id.clone()))?;
        for (id, neighbors) in &lists {
            let a = graph.position(id)?;
            for n in neighbors {
                let b = graph.position(n)?;
                graph.link(a, b);
            }
        }
        graph.finish();
        Ok(graph)
    }

    /// Build from an id universe and an undirected edge list.
    ///
    /// Edge endpoints must belong to the universe. Duplicate edges and
    /// self-loops are ignored.
    pub fn from_edges<I, E>(ids: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        E: IntoIterator<Item = (K, K)>,
    {
        let mut graph = Self::with_ids(ids)?;
        for (a, b) in edges {
            let a = graph.position(&a)?;
            let b = graph.position(&b)?;
            graph.link(a, b);
        }
        graph.finish();
        Ok(graph)
    }

    fn with_ids<I: IntoIterator<Item = K>>(ids: I) -> Result<Self> {
        let ids: Vec<K> = ids.into_iter().collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(Error::InvalidInput(format!("duplicate unit id: {id}")));
            }
        }
        let adjacency = vec![Vec::new(); ids.len()];
        Ok(Self {
            ids,
            index,
            adjacency,
        })
    }

    fn link(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    fn finish(&mut self) {
        for list in &mut self.adjacency {
            list.sort_unstable();
            list.dedup();
        }
    }

    /// Number of units in the graph
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the graph has no units
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unit ids in insertion order
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// Check whether a unit id belongs to the graph
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    fn position(&self, id: &K) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::unknown_unit(id))
    }

    /// Number of direct neighbors of a unit
    pub fn degree(&self, id: &K) -> Result<usize> {
        Ok(self.adjacency[self.position(id)?].len())
    }

    /// The units directly adjacent to `id`
    pub fn neighbors(&self, id: &K) -> Result<Neighbors<'_, K>> {
        let at = self.position(id)?;
        Ok(Neighbors {
            graph: self,
            inner: self.adjacency[at].iter(),
        })
    }

    /// The unit plus all units adjacent to it, the unit itself first
    pub fn closed_neighborhood(&self, id: &K) -> Result<Vec<&K>> {
        let at = self.position(id)?;
        let mut hood = Vec::with_capacity(self.adjacency[at].len() + 1);
        hood.push(&self.ids[at]);
        hood.extend(self.adjacency[at].iter().map(|&n| &self.ids[n]));
        Ok(hood)
    }

    /// Raise the graph to its k-th-order transitive closure.
    ///
    /// In the result, units are adjacent iff they are reachable within `k`
    /// hops in this graph (excluding self). Built once via BFS per unit and
    /// meant to be reused across every subsequent query; `k` is typically 3
    /// or 5.
    pub fn higher_order(&self, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidParameter(
                "closure order must be positive".to_string(),
            ));
        }

        let n = self.len();
        let mut adjacency = Vec::with_capacity(n);
        // per-source BFS bounded by depth k
        let mut depth = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        for source in 0..n {
            depth.iter_mut().for_each(|d| *d = usize::MAX);
            depth[source] = 0;
            queue.push_back(source);
            let mut reached = Vec::new();
            while let Some(at) = queue.pop_front() {
                if depth[at] == k {
                    continue;
                }
                for &next in &self.adjacency[at] {
                    if depth[next] == usize::MAX {
                        depth[next] = depth[at] + 1;
                        reached.push(next);
                        queue.push_back(next);
                    }
                }
            }
            reached.sort_unstable();
            adjacency.push(reached);
        }

        Ok(Self {
            ids: self.ids.clone(),
            index: self.index.clone(),
            adjacency,
        })
    }
}

impl<K: UnitKey> fmt::Display for ContiguityGraph<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links: usize = self.adjacency.iter().map(Vec::len).sum();
        write!(
            f,
            "ContiguityGraph({} units, {} links)",
            self.len(),
            links / 2
        )
    }
}

/// Iterator over a unit's direct neighbors
pub struct Neighbors<'a, K: UnitKey> {
    graph: &'a ContiguityGraph<K>,
    inner: std::slice::Iter<'a, usize>,
}

impl<'a, K: UnitKey> Iterator for Neighbors<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|&i| &self.graph.ids[i])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: UnitKey> ExactSizeIterator for Neighbors<'a, K> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 - 2 - 3 - 4 - 5
    fn line() -> ContiguityGraph<u64> {
        ContiguityGraph::from_edges(1..=5, [(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap()
    }

    #[test]
    fn test_neighbors_and_degree() {
        let g = line();
        assert_eq!(g.len(), 5);
        assert_eq!(g.degree(&1).unwrap(), 1);
        assert_eq!(g.degree(&3).unwrap(), 2);

        let ns: Vec<u64> = g.neighbors(&3).unwrap().copied().collect();
        assert_eq!(ns, vec![2, 4]);
    }

    #[test]
    fn test_closed_neighborhood() {
        let g = line();
        let hood: Vec<u64> = g
            .closed_neighborhood(&3)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        assert_eq!(hood, vec![3, 2, 4]);

        // isolated end unit
        let hood: Vec<u64> = g
            .closed_neighborhood(&1)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        assert_eq!(hood, vec![1, 2]);
    }

    #[test]
    fn test_symmetrization_from_neighbor_lists() {
        // only one direction listed
        let g = ContiguityGraph::from_neighbor_lists([
            (1u64, vec![2]),
            (2, vec![]),
            (3, vec![2]),
        ])
        .unwrap();
        let ns: Vec<u64> = g.neighbors(&2).unwrap().copied().collect();
        assert_eq!(ns, vec![1, 3]);
    }

    #[test]
    fn test_unknown_ids_fail() {
        let g = line();
        assert!(matches!(g.neighbors(&9), Err(Error::UnitNotFound(_))));
        assert!(matches!(
            g.closed_neighborhood(&9),
            Err(Error::UnitNotFound(_))
        ));

        let err = ContiguityGraph::from_edges([1u64, 2], [(1, 7)]).unwrap_err();
        assert!(matches!(err, Error::UnitNotFound(_)));

        let err =
            ContiguityGraph::from_neighbor_lists([(1u64, vec![2u64]), (3, vec![])]).unwrap_err();
        assert!(matches!(err, Error::UnitNotFound(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ContiguityGraph::from_edges([1u64, 1], []).unwrap_err();
        assert!(err.to_string().contains("duplicate unit id"));
    }

    #[test]
    fn test_self_loops_and_duplicate_edges_ignored() {
        let g = ContiguityGraph::from_edges(1..=2u64, [(1, 1), (1, 2), (2, 1)]).unwrap();
        assert_eq!(g.degree(&1).unwrap(), 1);
        assert_eq!(g.to_string(), "ContiguityGraph(2 units, 1 links)");
    }

    #[test]
    fn test_higher_order_on_line() {
        let g = line();
        let g2 = g.higher_order(2).unwrap();

        let ns: Vec<u64> = g2.neighbors(&1).unwrap().copied().collect();
        assert_eq!(ns, vec![2, 3]);

        let ns: Vec<u64> = g2.neighbors(&3).unwrap().copied().collect();
        assert_eq!(ns, vec![1, 2, 4, 5]);

        // order 1 keeps the original adjacency
        let g1 = g.higher_order(1).unwrap();
        let ns: Vec<u64> = g1.neighbors(&3).unwrap().copied().collect();
        assert_eq!(ns, vec![2, 4]);

        // large k saturates to the whole component (minus self)
        let g9 = g.higher_order(9).unwrap();
        assert_eq!(g9.degree(&1).unwrap(), 4);
    }

    #[test]
    fn test_higher_order_zero_rejected() {
        assert!(line().higher_order(0).is_err());
    }

    #[test]
    fn test_string_ids() {
        let g = ContiguityGraph::from_edges(
            ["a".to_string(), "b".to_string()],
            [("a".to_string(), "b".to_string())],
        )
        .unwrap();
        let hood: Vec<String> = g
            .closed_neighborhood(&"a".to_string())
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(hood, vec!["a".to_string(), "b".to_string()]);
    }
}
