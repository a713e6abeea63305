//! Co-occurrence graph over the roster and per-character centrality

use kizuna_domain::{Character, CharacterPair, Roster};
use petgraph::{graph::NodeIndex, Graph, Undirected};
use std::collections::{HashMap, VecDeque};

/// Centrality of one character in the current graph, rounded to 3 decimals
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Centrality {
    /// Share of the other characters directly connected
    pub degree: f64,

    /// Normalized share of shortest paths between others passing through
    pub betweenness: f64,

    /// Normalized inverse distance to reachable characters
    pub closeness: f64,
}

/// Undirected, unweighted graph of characters that have interacted
///
/// Every roster character is a vertex from the start. Edges are only ever
/// added during a run; [`CooccurrenceGraph::reset`] clears them between runs.
#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    graph: Graph<Character, (), Undirected>,
    node_index_map: HashMap<Character, NodeIndex>,
}

impl CooccurrenceGraph {
    /// Create an edgeless graph spanning `roster`
    pub fn new(roster: &Roster) -> Self {
        let mut graph = Graph::new_undirected();
        let mut node_index_map = HashMap::new();

        for character in roster.characters() {
            if !node_index_map.contains_key(character) {
                let idx = graph.add_node(character.clone());
                node_index_map.insert(character.clone(), idx);
            }
        }

        Self {
            graph,
            node_index_map,
        }
    }

    /// Connect the two characters of `pair`
    ///
    /// Returns whether a new edge was created. Characters outside the
    /// roster are ignored.
    pub fn add_interaction(&mut self, pair: &CharacterPair) -> bool {
        let (Some(&a), Some(&b)) = (
            self.node_index_map.get(&pair.first),
            self.node_index_map.get(&pair.second),
        ) else {
            return false;
        };

        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Whether the two characters of `pair` are connected
    pub fn has_edge(&self, pair: &CharacterPair) -> bool {
        match (
            self.node_index_map.get(&pair.first),
            self.node_index_map.get(&pair.second),
        ) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of vertices (the roster size)
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All edges as order-independent pairs, sorted
    pub fn edges(&self) -> Vec<(Character, Character)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a].clone(), self.graph[b].clone());
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        edges.sort();
        edges
    }

    /// Remove every edge, keeping the vertices
    pub fn reset(&mut self) {
        self.graph.clear_edges();
    }

    /// Degree, betweenness and closeness of `character` in the current graph
    ///
    /// Computed from scratch on every call. Unknown or isolated characters
    /// score 0 on all three.
    pub fn centrality(&self, character: &Character) -> Centrality {
        let Some(&idx) = self.node_index_map.get(character) else {
            return Centrality::default();
        };

        Centrality {
            degree: round3(self.degree_of(idx)),
            betweenness: round3(self.betweenness_of(idx)),
            closeness: round3(self.closeness_of(idx)),
        }
    }

    fn degree_of(&self, idx: NodeIndex) -> f64 {
        let n = self.node_count();
        if n <= 1 {
            return 0.0;
        }
        self.graph.neighbors(idx).count() as f64 / (n - 1) as f64
    }

    /// Brandes' algorithm, accumulating dependencies of `target` only
    fn betweenness_of(&self, target: NodeIndex) -> f64 {
        let n = self.node_count();
        if n <= 2 {
            return 0.0;
        }

        let mut total = 0.0;
        for source in self.graph.node_indices() {
            if source == target {
                continue;
            }

            let mut stack = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0_f64; n];
            let mut distance: Vec<Option<usize>> = vec![None; n];
            sigma[source.index()] = 1.0;
            distance[source.index()] = Some(0);

            let mut queue = VecDeque::from([source]);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                let dv = distance[v.index()].unwrap_or(0);
                for w in self.graph.neighbors(v) {
                    if distance[w.index()].is_none() {
                        distance[w.index()] = Some(dv + 1);
                        queue.push_back(w);
                    }
                    if distance[w.index()] == Some(dv + 1) {
                        sigma[w.index()] += sigma[v.index()];
                        predecessors[w.index()].push(v);
                    }
                }
            }

            let mut delta = vec![0.0_f64; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w.index()] {
                    delta[v.index()] +=
                        sigma[v.index()] / sigma[w.index()] * (1.0 + delta[w.index()]);
                }
                if w == target {
                    total += delta[w.index()];
                }
            }
        }

        // Sum runs over ordered (source, target) pairs
        total / ((n - 1) * (n - 2)) as f64
    }

    /// Closeness with the Wasserman-Faust scaling for disconnected graphs
    fn closeness_of(&self, idx: NodeIndex) -> f64 {
        let n = self.node_count();
        if n <= 1 {
            return 0.0;
        }

        let mut distance: HashMap<NodeIndex, usize> = HashMap::from([(idx, 0)]);
        let mut queue = VecDeque::from([idx]);
        while let Some(v) = queue.pop_front() {
            let dv = distance[&v];
            for w in self.graph.neighbors(v) {
                if !distance.contains_key(&w) {
                    distance.insert(w, dv + 1);
                    queue.push_back(w);
                }
            }
        }

        let total: usize = distance.values().sum();
        if total == 0 {
            return 0.0;
        }
        let reachable = (distance.len() - 1) as f64;
        (reachable / total as f64) * (reachable / (n - 1) as f64)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
